//=========================================================================
// Component Column
//=========================================================================
//
// Type-erased storage for one component type, so the ComponentsManager
// can keep every column in a single HashMap and still remove an entity
// from all of them without knowing their concrete types.
//
// Each column is a sparse set:
//
//   sparse[entity.index] ──► dense slot
//   dense[slot]          ──► Entity (generation-checked)
//   values[slot]         ──► C
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::{Component, Entity};

//=== ComponentColumn =====================================================

pub(super) trait ComponentColumn: Send + Sync {
    /// Drops the component owned by `entity`, if any.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn len(&self) -> usize;

    /// Drops every component while preserving allocated capacity.
    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== SparseSet ===========================================================

pub(super) struct SparseSet<C> {
    sparse: Vec<Option<u32>>,
    dense: Vec<Entity>,
    values: Vec<C>,
}

impl<C: Component> SparseSet<C> {
    pub(super) fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            values: Vec::new(),
        }
    }

    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.dense[slot] == entity).then_some(slot)
    }

    /// Stores `value`, returning the previous component of the same entity.
    ///
    /// A component left behind by an older generation of the same slot is
    /// overwritten and not returned.
    pub(super) fn insert(&mut self, entity: Entity, value: C) -> Option<C> {
        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }

        if let Some(slot) = self.sparse[index] {
            let slot = slot as usize;
            let previous = std::mem::replace(&mut self.values[slot], value);
            let same_owner = self.dense[slot] == entity;
            self.dense[slot] = entity;
            return same_owner.then_some(previous);
        }

        self.sparse[index] = Some(self.dense.len() as u32);
        self.dense.push(entity);
        self.values.push(value);
        None
    }

    pub(super) fn get(&self, entity: Entity) -> Option<&C> {
        self.slot_of(entity).map(|slot| &self.values[slot])
    }

    pub(super) fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.slot_of(entity).map(|slot| &mut self.values[slot])
    }

    /// Swap-removes the component of `entity`.
    pub(super) fn remove(&mut self, entity: Entity) -> Option<C> {
        let slot = self.slot_of(entity)?;
        self.sparse[entity.index() as usize] = None;

        self.dense.swap_remove(slot);
        let value = self.values.swap_remove(slot);

        if let Some(moved) = self.dense.get(slot) {
            self.sparse[moved.index() as usize] = Some(slot as u32);
        }
        Some(value)
    }

    pub(super) fn entities(&self) -> &[Entity] {
        &self.dense
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.dense.iter().copied().zip(self.values.iter())
    }

    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.dense.iter().copied().zip(self.values.iter_mut())
    }
}

impl<C: Component> ComponentColumn for SparseSet<C> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.values.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ecs::EntitiesManager;

    #[test]
    fn swap_remove_keeps_lookup_consistent() {
        let mut entities = EntitiesManager::new();
        let (a, b, c) = (entities.create(), entities.create(), entities.create());

        let mut set = SparseSet::new();
        set.insert(a, 'a');
        set.insert(b, 'b');
        set.insert(c, 'c');

        assert_eq!(set.remove(a), Some('a'));
        assert_eq!(set.entities(), &[c, b]);
        assert_eq!(set.get(c), Some(&'c'));
        assert_eq!(set.get(b), Some(&'b'));
        assert_eq!(set.get(a), None);
    }

    #[test]
    fn stale_generation_misses() {
        let mut entities = EntitiesManager::new();
        let old = entities.create();
        let mut set = SparseSet::new();
        set.insert(old, 1u8);

        entities.destroy(old);
        let new = entities.create();

        assert_eq!(set.get(new), None);
        assert_eq!(set.insert(new, 2), None, "stale value is not handed back");
        assert_eq!(set.get(old), None);
        assert_eq!(set.get(new), Some(&2));
    }

    #[test]
    fn clear_through_trait_object() {
        let mut entities = EntitiesManager::new();
        let mut set = SparseSet::new();
        for _ in 0..4 {
            set.insert(entities.create(), 0u32);
        }

        let column: &mut dyn ComponentColumn = &mut set;
        assert_eq!(column.len(), 4);
        column.clear();
        assert_eq!(column.len(), 0);
        assert!(column.as_any().downcast_ref::<SparseSet<u32>>().is_some());
    }
}
