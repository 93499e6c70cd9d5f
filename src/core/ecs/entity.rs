//=========================================================================
// Entities
//=========================================================================
//
// Entity identity and lifetime.
//
// An Entity is a generational handle into the EntitiesManager's slot
// vector. Destroying an entity bumps its slot generation, so handles
// kept past destruction report `is_alive() == false` even after the slot
// has been recycled for a new entity.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::memory::{IdVector, SlotId};

//=== Entity ==============================================================

/// Opaque, copyable entity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    fn from_slot(slot: SlotId) -> Self {
        Self {
            index: slot.index,
            generation: slot.generation,
        }
    }

    fn slot(self) -> SlotId {
        SlotId {
            index: self.index,
            generation: self.generation,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.generation)
    }
}

//=== EntitiesManager =====================================================

#[derive(Debug, Default)]
struct EntityRecord {
    name: Option<String>,
}

/// Allocates, names and destroys entities.
#[derive(Debug, Default)]
pub struct EntitiesManager {
    records: IdVector<EntityRecord>,
}

impl EntitiesManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Lifetime ---------------------------------------------------------

    pub fn create(&mut self) -> Entity {
        let entity = Entity::from_slot(self.records.insert(EntityRecord::default()));
        trace!(target: "ecs", "created entity {}", entity);
        entity
    }

    pub fn create_named(&mut self, name: impl Into<String>) -> Entity {
        let name = name.into();
        trace!(target: "ecs", "creating entity '{}'", name);
        Entity::from_slot(self.records.insert(EntityRecord { name: Some(name) }))
    }

    /// Destroys `entity`. Returns `false` if it was already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let destroyed = self.records.remove(entity.slot()).is_some();
        if destroyed {
            trace!(target: "ecs", "destroyed entity {}", entity);
        }
        destroyed
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.records.contains(entity.slot())
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.records
            .get(entity.slot())
            .and_then(|record| record.name.as_deref())
    }

    /// First live entity carrying `name`, in slot order.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.records
            .iter()
            .find(|(_, record)| record.name.as_deref() == Some(name))
            .map(|(slot, _)| Entity::from_slot(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.records.iter().map(|(slot, _)| Entity::from_slot(slot))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//=========================================================================
// Tests
//=========================================================================
