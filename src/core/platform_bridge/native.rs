//=========================================================================
// Native Bridge
//=========================================================================
//
// Calls from game code into platform-native functionality (vibration,
// toasts, store links, device info, ...), addressed by name.
//
//   Game ──call("device.vibrate", args)──► dyn NativeBridge
//                                           ├─ LocalNativeBridge (Rust handlers)
//                                           └─ platform adapters
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::memory::AsyncMap;

//=== NativeValue =========================================================

/// Value passed across the native boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NativeValue {
    /// No value (void return).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl NativeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            NativeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            NativeValue::Float(v) => Some(*v),
            NativeValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            NativeValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "bool",
            NativeValue::Int(_) => "int",
            NativeValue::Float(_) => "float",
            NativeValue::Str(_) => "string",
            NativeValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Null => write!(f, "null"),
            NativeValue::Bool(v) => write!(f, "{}", v),
            NativeValue::Int(v) => write!(f, "{}", v),
            NativeValue::Float(v) => write!(f, "{}", v),
            NativeValue::Str(v) => write!(f, "{:?}", v),
            NativeValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

//--- Conversions ----------------------------------------------------------

impl From<()> for NativeValue {
    fn from(_: ()) -> Self {
        NativeValue::Null
    }
}

impl From<bool> for NativeValue {
    fn from(v: bool) -> Self {
        NativeValue::Bool(v)
    }
}

impl From<i32> for NativeValue {
    fn from(v: i32) -> Self {
        NativeValue::Int(v.into())
    }
}

impl From<i64> for NativeValue {
    fn from(v: i64) -> Self {
        NativeValue::Int(v)
    }
}

impl From<f64> for NativeValue {
    fn from(v: f64) -> Self {
        NativeValue::Float(v)
    }
}

impl From<&str> for NativeValue {
    fn from(v: &str) -> Self {
        NativeValue::Str(v.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(v: String) -> Self {
        NativeValue::Str(v)
    }
}

impl From<Vec<u8>> for NativeValue {
    fn from(v: Vec<u8>) -> Self {
        NativeValue::Bytes(v)
    }
}

//=== NativeError =========================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NativeError {
    #[error("native function '{0}' is not registered")]
    NotRegistered(String),

    #[error("invalid arguments for '{name}': {message}")]
    InvalidArguments { name: String, message: String },

    #[error("native function '{name}' failed: {message}")]
    Failed { name: String, message: String },
}

impl NativeError {
    /// Argument-type error for argument `index` of `name`.
    pub fn expected(name: &str, index: usize, expected: &str, args: &[NativeValue]) -> Self {
        let actual = args.get(index).map(NativeValue::type_name).unwrap_or("nothing");
        NativeError::InvalidArguments {
            name: name.to_string(),
            message: format!("argument {} must be {}, got {}", index, expected, actual),
        }
    }
}

//=== NativeBridge ========================================================

/// Named calls into platform code.
pub trait NativeBridge: Send + Sync {
    fn call(&self, name: &str, args: &[NativeValue]) -> Result<NativeValue, NativeError>;

    fn has(&self, name: &str) -> bool;
}

//=== LocalNativeBridge ===================================================

pub type NativeHandler =
    Arc<dyn Fn(&[NativeValue]) -> Result<NativeValue, NativeError> + Send + Sync>;

/// In-process bridge backed by registered Rust closures.
///
/// Used on desktop and in tests; handlers can be registered from any
/// thread while the engine is running.
#[derive(Default)]
pub struct LocalNativeBridge {
    handlers: AsyncMap<String, NativeHandler>,
}

impl LocalNativeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`. Returns `true` if it replaced an
    /// existing handler.
    pub fn register<F>(&self, name: impl Into<String>, handler: F) -> bool
    where
        F: Fn(&[NativeValue]) -> Result<NativeValue, NativeError> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(target: "platform", "registering native handler '{}'", name);
        self.handlers.insert(name, Arc::new(handler)).is_some()
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.handlers.remove(&name.to_string()).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names = self.handlers.keys();
        names.sort();
        names
    }
}

impl NativeBridge for LocalNativeBridge {
    fn call(&self, name: &str, args: &[NativeValue]) -> Result<NativeValue, NativeError> {
        // Clone the handler out so it runs without holding the map lock.
        let handler = self.handlers.get(&name.to_string()).ok_or_else(|| {
            warn!(target: "platform", "native call to unregistered '{}'", name);
            NativeError::NotRegistered(name.to_string())
        })?;
        handler(args)
    }

    fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.to_string())
    }
}

impl fmt::Debug for LocalNativeBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalNativeBridge")
            .field("handlers", &self.names())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
