use std::fmt;

use thiserror::Error;

/// Lifecycle of an [`Engine`](super::Engine).
///
/// ```text
/// Created ──start──► Running ◄──resume── Paused
///                       │ └────pause────►  │
///                       └──stop──► Stopped ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Created,
    Running,
    Paused,
    Stopped,
}

impl EngineState {
    /// `Stopped` is terminal; no transition leaves it.
    pub fn is_final(&self) -> bool {
        matches!(self, EngineState::Stopped)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Created => "created",
            EngineState::Running => "running",
            EngineState::Paused => "paused",
            EngineState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cannot {action} an engine that is {from}")]
    InvalidTransition {
        from: EngineState,
        action: &'static str,
    },
}
