//=========================================================================
// Engine Configuration
//=========================================================================
//
// Startup settings, loadable from RON and adjustable through the
// ApplicationBuilder.
//
//   (
//       tps: 60,
//       window: (title: "bt", width: 800, height: 600),
//       clear_color: (r: 0.0, g: 0.0, b: 0.0, a: 1.0),
//       asset_root: "assets",
//       log_level: Info,
//   )
//
// Every field is optional in the file; missing ones take their defaults.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::math::Color4f;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== LogLevel ============================================================

/// Serializable mirror of `log::LevelFilter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "bt".to_string(),
            width: 800,
            height: 600,
        }
    }
}

//=== EngineConfig ========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed logic ticks per second.
    pub tps: u32,

    /// Capacity of the platform → logic event channel.
    pub channel_capacity: usize,

    /// Most ticks run for one frame before excess time is dropped.
    pub max_frame_skip: u32,

    pub window: WindowConfig,

    pub clear_color: Color4f,

    pub asset_root: PathBuf,

    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tps: 60,
            channel_capacity: 128,
            max_frame_skip: 5,
            window: WindowConfig::default(),
            clear_color: Color4f::BLACK,
            asset_root: PathBuf::from("assets"),
            log_level: LogLevel::Info,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tps == 0 {
            return Err(ConfigError::Invalid("tps must be greater than zero".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be greater than zero".into(),
            ));
        }
        if self.max_frame_skip == 0 {
            return Err(ConfigError::Invalid(
                "max_frame_skip must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Seconds per logic tick.
    pub fn tick_duration(&self) -> f64 {
        1.0 / self.tps as f64
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
