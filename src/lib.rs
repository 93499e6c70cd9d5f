//=========================================================================
// bt Engine: Library Root
//
// A small arcade game engine: an ECS world with an event bus and async
// asset loading, driven at a fixed tick rate on a logic thread, with the
// platform reached only through the interfaces in
// `core::platform_bridge`.
//
// Typical usage:
// ```no_run
// use bt_engine::prelude::*;
//
// struct Pong;
// impl GraphicsListener for Pong {}
// impl Game for Pong {}
//
// fn main() -> Result<(), AppError> {
//     ApplicationBuilder::new().build(Pong).run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine itself and is public for extension; games
// mostly need the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the winit desktop backend, reached through
// `Application::run`.
//
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::app::{AppError, Application, ApplicationBuilder, Game, GraphicsListener};
pub use crate::core::engine::{ArcadeEngine, Engine};
pub use crate::core::platform_bridge::logger as logging;
