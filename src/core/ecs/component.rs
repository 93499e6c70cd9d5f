//=========================================================================
// Components Manager
//=========================================================================
//
// Per-type component storage.
//
// Architecture:
//   insert<C>(e, c) → HashMap<TypeId, Box<dyn ComponentColumn>>
//                              ↓
//                     SparseSet<C> (dense, swap-remove)
//                              ↓
//   iter<C>() / join2<A, B>() / for_each_with<A, B>()
//
// Iteration follows dense order, which changes when components are
// removed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, TypeId};
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::component_column::{ComponentColumn, SparseSet};
use super::{Component, EcsError, Entity};

//=== ComponentsManager ===================================================

#[derive(Default)]
pub struct ComponentsManager {
    columns: HashMap<TypeId, Box<dyn ComponentColumn>>,
}

impl ComponentsManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Column Access ----------------------------------------------------

    fn column<C: Component>(&self) -> Option<&SparseSet<C>> {
        self.columns
            .get(&TypeId::of::<C>())
            .and_then(|column| column.as_any().downcast_ref::<SparseSet<C>>())
    }

    fn column_mut<C: Component>(&mut self) -> Option<&mut SparseSet<C>> {
        self.columns
            .get_mut(&TypeId::of::<C>())
            .and_then(|column| column.as_any_mut().downcast_mut::<SparseSet<C>>())
    }

    //--- Mutation ---------------------------------------------------------

    /// Attaches `component` to `entity`, returning the one it replaced.
    ///
    /// Liveness is not checked here; `World::insert` does that.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> Option<C> {
        let column = self
            .columns
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(SparseSet::<C>::new()));

        column
            .as_any_mut()
            .downcast_mut::<SparseSet<C>>()
            .and_then(|set| set.insert(entity, component))
    }

    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.column_mut::<C>()?.remove(entity)
    }

    /// Removes every component type owned by `entity`.
    ///
    /// Returns how many components were dropped.
    pub fn remove_all(&mut self, entity: Entity) -> usize {
        self.columns
            .values_mut()
            .map(|column| column.remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Drops all components, keeping the per-type columns allocated.
    pub fn clear(&mut self) {
        for column in self.columns.values_mut() {
            column.clear();
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.column::<C>()?.get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.column_mut::<C>()?.get_mut(entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.get::<C>(entity).is_some()
    }

    pub fn count<C: Component>(&self) -> usize {
        self.column::<C>().map(|set| set.entities().len()).unwrap_or(0)
    }

    pub fn entities_with<C: Component>(&self) -> Vec<Entity> {
        self.column::<C>()
            .map(|set| set.entities().to_vec())
            .unwrap_or_default()
    }

    pub fn iter<C: Component>(&self) -> impl Iterator<Item = (Entity, &C)> + '_ {
        self.column::<C>().into_iter().flat_map(|set| set.iter())
    }

    pub fn iter_mut<C: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut C)> + '_ {
        self.column_mut::<C>().into_iter().flat_map(|set| set.iter_mut())
    }

    /// Entities owning both `A` and `B`, in `A`'s dense order.
    pub fn join2<A: Component, B: Component>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B)> + '_ {
        let others = self.column::<B>();
        self.iter::<A>().filter_map(move |(entity, a)| {
            others
                .and_then(|set| set.get(entity))
                .map(|b| (entity, a, b))
        })
    }

    /// Visits every entity owning both components with `A` mutable.
    ///
    /// Returns the number of entities visited.
    pub fn for_each_with<A, B, F>(&mut self, mut visit: F) -> Result<usize, EcsError>
    where
        A: Component,
        B: Component,
        F: FnMut(Entity, &mut A, &B),
    {
        if TypeId::of::<A>() == TypeId::of::<B>() {
            return Err(EcsError::AliasedComponent(type_name::<A>()));
        }

        let Some(mut column) = self.columns.remove(&TypeId::of::<A>()) else {
            return Ok(0);
        };

        let mut visited = 0;
        if let Some(set) = column.as_any_mut().downcast_mut::<SparseSet<A>>() {
            let others = self.column::<B>();
            for (entity, a) in set.iter_mut() {
                if let Some(b) = others.and_then(|others| others.get(entity)) {
                    visit(entity, a, b);
                    visited += 1;
                }
            }
        }

        self.columns.insert(TypeId::of::<A>(), column);
        Ok(visited)
    }
}

//=========================================================================
// Tests
//=========================================================================
