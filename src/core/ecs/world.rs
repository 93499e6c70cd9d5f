//=========================================================================
// World
//=========================================================================
//
// Aggregate of everything systems operate on: entities, their components,
// the event bus and the asset manager.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Component, ComponentsManager, EcsError, EntitiesManager, Entity, EventsManager};
use crate::core::assets::AssetManager;

//=== Built-in Events =====================================================

/// Published by [`World::despawn`] once the entity and its components
/// are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDespawned(pub Entity);

//=== World ===============================================================

pub struct World {
    entities: EntitiesManager,
    components: ComponentsManager,
    events: EventsManager,
    assets: AssetManager,
}

impl World {
    /// Creates an empty world whose assets resolve under `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            entities: EntitiesManager::new(),
            components: ComponentsManager::new(),
            events: EventsManager::new(),
            assets: AssetManager::new(asset_root),
        }
    }

    //--- Entity Lifetime --------------------------------------------------

    pub fn spawn(&mut self) -> Entity {
        self.entities.create()
    }

    pub fn spawn_named(&mut self, name: impl Into<String>) -> Entity {
        self.entities.create_named(name)
    }

    /// Destroys `entity`, drops its components and publishes
    /// [`EntityDespawned`].
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.entities.destroy(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        let dropped = self.components.remove_all(entity);
        debug!(target: "ecs", "despawned {} ({} components)", entity, dropped);

        self.events.publish(EntityDespawned(entity));
        Ok(())
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    //--- Components -------------------------------------------------------

    /// Attaches `component` to a live entity.
    pub fn insert<C: Component>(
        &mut self,
        entity: Entity,
        component: C,
    ) -> Result<Option<C>, EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        Ok(self.components.insert(entity, component))
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.components.get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.components.get_mut(entity)
    }

    //--- Managers ---------------------------------------------------------

    pub fn entities(&self) -> &EntitiesManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntitiesManager {
        &mut self.entities
    }

    pub fn components(&self) -> &ComponentsManager {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentsManager {
        &mut self.components
    }

    pub fn events(&self) -> &EventsManager {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventsManager {
        &mut self.events
    }

    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetManager {
        &mut self.assets
    }

    /// Publishes finished asset loads onto the event bus.
    pub fn poll_assets(&mut self) -> usize {
        self.assets.poll(&mut self.events)
    }

    /// Drops all world contents without publishing despawn events.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
        self.events.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new("assets")
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);

    #[test]
    fn despawn_removes_components_and_publishes_event() {
        let mut world = World::default();
        let e = world.spawn_named("crate");
        world.insert(e, Health(3)).unwrap();

        world.despawn(e).unwrap();

        assert!(!world.is_alive(e));
        assert!(world.get::<Health>(e).is_none());
        assert_eq!(world.components().count::<Health>(), 0);

        world.events_mut().dispatch();
        assert_eq!(world.events().read::<EntityDespawned>(), &[EntityDespawned(e)]);
    }

    #[test]
    fn dead_entities_are_rejected() {
        let mut world = World::default();
        let e = world.spawn();
        world.despawn(e).unwrap();

        assert_eq!(world.despawn(e), Err(EcsError::DeadEntity(e)));
        assert_eq!(world.insert(e, Health(1)), Err(EcsError::DeadEntity(e)));
    }

    #[test]
    fn recycled_entity_starts_without_components() {
        let mut world = World::default();
        let old = world.spawn();
        world.insert(old, Health(10)).unwrap();
        world.despawn(old).unwrap();

        let new = world.spawn();
        assert_eq!(new.index(), old.index());
        assert!(world.get::<Health>(new).is_none());
    }

    #[test]
    fn get_mut_through_world() {
        let mut world = World::default();
        let e = world.spawn();
        world.insert(e, Health(5)).unwrap();

        world.get_mut::<Health>(e).unwrap().0 -= 2;
        assert_eq!(world.get::<Health>(e), Some(&Health(3)));
    }
}
