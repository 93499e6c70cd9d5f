//=========================================================================
// IdVector
//=========================================================================
//
// Generational slot vector.
//
//   insert() ──► free list (LIFO) or new slot ──► SlotId { index, generation }
//   remove() ──► generation += 1, index pushed to free list
//
// A SlotId resolves only while its generation matches the slot, so ids
// held after removal never alias the slot's next occupant.
//
//=========================================================================

//=== SlotId ==============================================================

/// Handle to a value stored in an [`IdVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    pub index: u32,
    pub generation: u32,
}

//=== Slot ================================================================

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

//=== IdVector ============================================================

/// Dense-indexed storage with generation-checked handles.
#[derive(Debug)]
pub struct IdVector<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> IdVector<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    //--- Mutation ---------------------------------------------------------

    /// Stores `value`, reusing the most recently freed slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return SlotId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotId {
            index,
            generation: 0,
        }
    }

    /// Removes the value behind `id`; stale or unknown ids return `None`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    //--- Access -----------------------------------------------------------

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated (live + free).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for IdVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut vector = IdVector::new();
        let a = vector.insert("a");
        let b = vector.insert("b");

        assert_eq!(vector.get(a), Some(&"a"));
        assert_eq!(vector.get(b), Some(&"b"));
        assert_eq!(vector.len(), 2);
    }

    #[test]
    fn removed_slot_is_reused_with_new_generation() {
        let mut vector = IdVector::new();
        let old = vector.insert(1);
        assert_eq!(vector.remove(old), Some(1));

        let new = vector.insert(2);
        assert_eq!(new.index, old.index);
        assert_eq!(new.generation, old.generation + 1);

        assert!(vector.get(old).is_none(), "stale id must not resolve");
        assert_eq!(vector.get(new), Some(&2));
        assert_eq!(vector.capacity(), 1);
    }

    #[test]
    fn double_remove_is_noop() {
        let mut vector = IdVector::new();
        let id = vector.insert(());
        assert!(vector.remove(id).is_some());
        assert!(vector.remove(id).is_none());
        assert_eq!(vector.len(), 0);
    }

    #[test]
    fn free_list_is_lifo() {
        let mut vector = IdVector::new();
        let a = vector.insert('a');
        let b = vector.insert('b');
        vector.remove(a);
        vector.remove(b);

        assert_eq!(vector.insert('c').index, b.index);
        assert_eq!(vector.insert('d').index, a.index);
    }

    #[test]
    fn clear_invalidates_all_ids() {
        let mut vector = IdVector::new();
        let ids: Vec<_> = (0..4).map(|i| vector.insert(i)).collect();
        vector.clear();

        assert!(vector.is_empty());
        assert!(ids.iter().all(|id| !vector.contains(*id)));
        assert_eq!(vector.iter().count(), 0);
    }
}
