//=========================================================================
// Core
//=========================================================================
//
// Everything that runs independently of a concrete platform.
//
// Layers (leaves first):
//   math ─► memory ─► ecs ─► assets ─► engine ─► app
//                                 ▲
//   platform_bridge ──────────────┘ (interfaces the platform implements)
//
// `config` is shared by `engine` and `app`.
//
//=========================================================================

pub mod app;
pub mod assets;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod math;
pub mod memory;
pub mod platform_bridge;
