//=========================================================================
// Engine Events
//=========================================================================
//
// Events the engine publishes on the world's event bus. Systems read them
// like any other event, one tick after they happened.
//
//=========================================================================

use super::EngineState;
use crate::core::platform_bridge::SurfaceSize;

/// A drawable surface became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceReady(pub SurfaceSize);

/// The surface was resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceChanged(pub SurfaceSize);

/// The surface is gone until the next [`SurfaceReady`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub from: EngineState,
    pub to: EngineState,
}
