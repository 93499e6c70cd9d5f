//=========================================================================
// Engine
//=========================================================================
//
// Per-frame coordination of the ECS world.
//
//   ArcadeEngine (fixed step)
//     └─► Engine
//           ├─ World (entities, components, events, assets)
//           ├─ SystemsManager
//           └─ drawables
//
//=========================================================================

mod arcade;
mod events;
mod runtime;
mod state;

pub use arcade::ArcadeEngine;
pub use events::{StateChanged, SurfaceChanged, SurfaceLost, SurfaceReady};
pub use runtime::{DrawableId, Engine};
pub use state::{EngineError, EngineState};
