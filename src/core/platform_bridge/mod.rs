//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges platform layers (winit, Android, test harnesses) with the core.
//
// Core code only ever sees the interfaces defined here, so platform
// backends can be swapped without touching the engine.
//
// Components:
// - `interface`: lifecycle events, errors and the adapter contract
// - `event_collector`: core-side event collection with bounded polling
// - `input`: platform-neutral keyboard and pointer events
// - `graphics`: Drawable / Renderer and the recorded display list
// - `logger`: platform log sinks behind the `log` facade
// - `native`: named calls into platform-native code
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
mod graphics;
mod input;
mod interface;
pub mod logger;
mod native;

//=== Public API ==========================================================

pub use graphics::{DisplayList, Drawable, Frame, RenderCommand, Renderer};
pub use input::{InputEvent, KeyCode, Modifiers, MouseButton, PointerId};
pub use interface::{PlatformAdapter, PlatformError, PlatformEvent, SurfaceSize};
pub use logger::{ConsoleLogger, LogBridge, Logger};
pub use native::{LocalNativeBridge, NativeBridge, NativeError, NativeHandler, NativeValue};

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
