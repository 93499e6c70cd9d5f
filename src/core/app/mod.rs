//=========================================================================
// Application Layer
//=========================================================================
//
// Threads and wiring around the engine.
//
//  Main thread:                      Logic thread ("bt-logic"):
//  ┌─────────────────────────┐       ┌──────────────────────────┐
//  │ PlatformAdapter::run    │       │ Orchestrator             │
//  │  (winit, test harness)  │       │  ├─ EventCollector       │
//  │                         │ ────► │  ├─ ArcadeEngine         │
//  │                         │ Event │  └─ Game callbacks       │
//  │                         │ ◄──── │                          │
//  └─────────────────────────┘ Frame └──────────────────────────┘
//
//=========================================================================

mod application;
mod game;
mod orchestrator;

pub use application::{AppError, Application, ApplicationBuilder};
pub use game::{Game, GraphicsListener};
