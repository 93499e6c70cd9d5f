//=========================================================================
// IdMap
//=========================================================================
//
// Map from engine-assigned numeric ids to values.
//
// Ids start at 1 and increase monotonically; a removed id is never handed
// out again, so a stale id can only ever miss.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

//=== IdMap ===============================================================

/// Owns values keyed by monotonically assigned `u64` ids.
///
/// Iteration yields entries in ascending id order, i.e. insertion order.
#[derive(Debug)]
pub struct IdMap<T> {
    entries: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> IdMap<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Stores `value` under a fresh id and returns the id.
    pub fn insert(&mut self, value: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, value);
        id
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut T)> {
        self.entries.iter_mut().map(|(id, value)| (*id, value))
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all values. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for IdMap<T> {
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
    fn ids_start_at_one_and_increase() {
        let mut map = IdMap::new();
        assert_eq!(map.insert('a'), 1);
        assert_eq!(map.insert('b'), 2);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut map = IdMap::new();
        let first = map.insert("first");
        assert_eq!(map.remove(first), Some("first"));

        let second = map.insert("second");
        assert_ne!(first, second);
        assert!(map.get(first).is_none());

        map.clear();
        assert!(map.insert("third") > second);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut map = IdMap::new();
        let a = map.insert(10);
        let b = map.insert(20);
        let c = map.insert(30);
        map.remove(b);

        let collected: Vec<_> = map.iter().map(|(id, v)| (id, *v)).collect();
        assert_eq!(collected, vec![(a, 10), (c, 30)]);
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut map = IdMap::new();
        let id = map.insert(1);
        *map.get_mut(id).unwrap() += 41;
        assert_eq!(map.get(id), Some(&42));
    }
}
