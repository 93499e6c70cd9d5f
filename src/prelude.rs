//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use bt_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Application
pub use crate::core::app::{AppError, Application, ApplicationBuilder, Game, GraphicsListener};
pub use crate::core::config::{EngineConfig, LogLevel, WindowConfig};

// Engine
pub use crate::core::engine::{
    ArcadeEngine, DrawableId, Engine, EngineState, StateChanged, SurfaceChanged, SurfaceLost,
    SurfaceReady,
};

// ECS
pub use crate::core::ecs::{
    Component, Entity, EntityDespawned, Event, EventSender, System, SystemId, World,
};

// Assets
pub use crate::core::assets::{AssetFailed, AssetHandle, AssetLoaded, AssetState};

// Math
pub use crate::core::math::{Color4f, Rect};

// Platform interfaces
pub use crate::core::platform_bridge::{
    Drawable, InputEvent, KeyCode, Modifiers, MouseButton, NativeBridge, NativeValue, PointerId,
    Renderer, SurfaceSize,
};
