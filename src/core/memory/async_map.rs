//=========================================================================
// AsyncMap
//=========================================================================
//
// Thread-safe hash map. Values are handed out by clone (typically `Arc`)
// so no reference outlives the lock.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

//=== Internal Dependencies ===============================================

use super::{Lock, Mutex};

//=== AsyncMap ============================================================

/// Lock-protected `HashMap`, shareable behind an `Arc`.
pub struct AsyncMap<K, V, L = Mutex<HashMap<K, V>>> {
    inner: L,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Eq + Hash, V> AsyncMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Eq + Hash, V, L: Lock<HashMap<K, V>>> AsyncMap<K, V, L> {
    //--- Mutation ---------------------------------------------------------

    /// Inserts a value, returning the one it replaced.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Mutates the value under `key` in place.
    ///
    /// Returns `false` if the key is absent.
    pub fn update<F>(&self, key: &K, mutate: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        match self.inner.lock().get_mut(key) {
            Some(value) => {
                mutate(value);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Runs `read` against the value under `key` without cloning it.
    pub fn with<R, F>(&self, key: &K, read: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(read)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<K: Eq + Hash, V: Clone, L: Lock<HashMap<K, V>>> AsyncMap<K, V, L> {
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns the existing value or inserts the one produced by `make`.
    ///
    /// `make` runs under the lock, so concurrent callers never insert twice.
    pub fn get_or_insert_with<F>(&self, key: K, make: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.inner.lock().entry(key).or_insert_with(make).clone()
    }
}

impl<K: Eq + Hash + Clone, V, L: Lock<HashMap<K, V>>> AsyncMap<K, V, L> {
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys().cloned().collect()
    }
}

impl<K: Eq + Hash, V, L: Lock<HashMap<K, V>>> Default for AsyncMap<K, V, L> {
    fn default() -> Self {
        Self {
            inner: L::new(HashMap::new()),
            _marker: PhantomData,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn insert_get_remove() {
        let map = AsyncMap::new();
        assert_eq!(map.insert("hp", 10), None);
        assert_eq!(map.insert("hp", 12), Some(10));
        assert_eq!(map.get(&"hp"), Some(12));
        assert!(map.contains_key(&"hp"));
        assert_eq!(map.remove(&"hp"), Some(12));
        assert!(map.is_empty());
    }

    #[test]
    fn update_only_touches_existing_keys() {
        let map: AsyncMap<u32, Vec<u32>> = AsyncMap::new();
        map.insert(1, vec![]);

        assert!(map.update(&1, |v| v.push(7)));
        assert!(!map.update(&2, |v| v.push(7)));
        assert_eq!(map.with(&1, |v| v.len()), Some(1));
        assert_eq!(map.with(&2, |v| v.len()), None);
    }

    #[test]
    fn get_or_insert_with_runs_factory_once() {
        let map: Arc<AsyncMap<&'static str, usize>> = Arc::new(AsyncMap::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let map = Arc::clone(&map);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    map.get_or_insert_with("shared", || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        42
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn keys_lists_all_entries() {
        let map: AsyncMap<u8, ()> = AsyncMap::new();
        map.insert(3, ());
        map.insert(1, ());

        let mut keys = map.keys();
        keys.sort();
        assert_eq!(keys, vec![1, 3]);
    }
}
