//=========================================================================
// AsyncVector
//=========================================================================
//
// Thread-safe growable vector. Used as a result sink between worker
// threads and the logic thread (e.g. completed asset loads).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;

//=== Internal Dependencies ===============================================

use super::{Lock, Mutex};

//=== AsyncVector =========================================================

/// Lock-protected `Vec`, shareable behind an `Arc`.
pub struct AsyncVector<T, L = Mutex<Vec<T>>> {
    inner: L,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AsyncVector<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, L: Lock<Vec<T>>> AsyncVector<T, L> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: L::new(Vec::with_capacity(capacity)),
            _marker: PhantomData,
        }
    }

    pub fn push(&self, value: T) {
        self.inner.lock().push(value);
    }

    /// Replaces the element at `index`, returning the previous value.
    ///
    /// Returns `None` (and drops nothing) if `index` is out of bounds.
    pub fn set(&self, index: usize, value: T) -> Option<T> {
        let mut guard = self.inner.lock();
        guard
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Removes and returns the element at `index`, shifting later elements.
    pub fn remove(&self, index: usize) -> Option<T> {
        let mut guard = self.inner.lock();
        (index < guard.len()).then(|| guard.remove(index))
    }

    /// Takes every element, leaving the vector empty.
    pub fn take_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn retain<F>(&self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.inner.lock().retain(keep);
    }

    /// Visits every element while holding the lock.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        for value in self.inner.lock().iter() {
            visit(value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<T: Clone, L: Lock<Vec<T>>> AsyncVector<T, L> {
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.lock().get(index).cloned()
    }

    /// Clones the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().clone()
    }
}

impl<T, L: Lock<Vec<T>>> Default for AsyncVector<T, L> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn indexed_access() {
        let vector = AsyncVector::new();
        vector.push("a");
        vector.push("b");
        vector.push("c");

        assert_eq!(vector.get(1), Some("b"));
        assert_eq!(vector.set(1, "B"), Some("b"));
        assert_eq!(vector.set(9, "z"), None);
        assert_eq!(vector.remove(0), Some("a"));
        assert_eq!(vector.remove(5), None);
        assert_eq!(vector.snapshot(), vec!["B", "c"]);
    }

    #[test]
    fn take_all_empties_vector() {
        let vector: AsyncVector<i32> = AsyncVector::new();
        vector.push(1);
        vector.push(2);

        assert_eq!(vector.take_all(), vec![1, 2]);
        assert!(vector.is_empty());
    }

    #[test]
    fn retain_and_for_each() {
        let vector: AsyncVector<i32> = AsyncVector::new();
        for i in 0..10 {
            vector.push(i);
        }
        vector.retain(|v| v % 2 == 0);

        let mut sum = 0;
        vector.for_each(|v| sum += v);
        assert_eq!(sum, 2 + 4 + 6 + 8);
        assert_eq!(vector.len(), 5);
    }

    #[test]
    fn shared_between_threads() {
        let vector: Arc<AsyncVector<usize>> = Arc::new(AsyncVector::new());
        let worker = {
            let vector = Arc::clone(&vector);
            thread::spawn(move || {
                for i in 0..100 {
                    vector.push(i);
                }
            })
        };
        worker.join().unwrap();
        assert_eq!(vector.len(), 100);
    }
}
