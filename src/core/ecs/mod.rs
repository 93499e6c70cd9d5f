//=========================================================================
// Entity Component System
//=========================================================================
//
// Identity (Entity), data (Component) and behavior (System), plus the
// event bus systems use to talk to each other.
//
//   EntitiesManager   ─ generational entity handles
//   ComponentsManager ─ per-type sparse sets
//   SystemsManager    ─ ordered per-tick behavior
//   EventsManager     ─ double-buffered typed events
//   World             ─ owns the above (minus systems) and the assets
//
//=========================================================================

//=== Module Declarations =================================================

mod component;
mod component_column;
mod entity;
mod error;
mod event;
mod event_queue;
mod system;
mod world;

//=== Public API ==========================================================

pub use component::ComponentsManager;
pub use entity::{EntitiesManager, Entity};
pub use error::EcsError;
pub use event::{EventSender, EventsManager, ListenerId};
pub use system::{System, SystemId, SystemsManager};
pub use world::{EntityDespawned, World};

//=== Marker Traits =======================================================

/// Data attachable to an entity.
///
/// Automatically implemented for all types that are Send + Sync + 'static.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// Payload carried by the [`EventsManager`].
///
/// Automatically implemented for all types that are Send + 'static.
pub trait Event: Send + 'static {}

impl<T: Send + 'static> Event for T {}
