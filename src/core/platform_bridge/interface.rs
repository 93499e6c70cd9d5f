//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events, errors, adapter contract).
//
//   PlatformAdapter::run ──PlatformEvent──► logic thread
//                        ◄──────Frame──────
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{Frame, InputEvent};

//=== SurfaceSize =========================================================

/// Drawable surface dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// A drawable surface exists for the first time (or again after loss).
    SurfaceCreated(SurfaceSize),

    SurfaceChanged(SurfaceSize),

    /// The surface is gone; nothing can be presented until recreated.
    SurfaceDestroyed,

    /// App moved to the background.
    Paused,

    Resumed,

    /// Batched input events for a frame.
    Input(Vec<InputEvent>),

    /// Window close or app termination requested.
    Closed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    #[error("event loop error: {0}")]
    EventLoopExecution(String),

    #[error("window creation failed: {0}")]
    WindowCreation(String),
}

//=== PlatformAdapter =====================================================

/// A platform backend driving the engine from its own event loop.
///
/// `run` blocks on the calling thread until the platform shuts down. It
/// forwards lifecycle and input events through `events` and consumes
/// rendered frames from `frames`. Dropping `events` (returning) signals
/// the logic thread to stop.
pub trait PlatformAdapter {
    fn run(
        self,
        events: Sender<PlatformEvent>,
        frames: Receiver<Frame>,
    ) -> Result<(), PlatformError>;
}
