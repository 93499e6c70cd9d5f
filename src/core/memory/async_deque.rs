//=========================================================================
// AsyncDeque
//=========================================================================
//
// Thread-safe double-ended queue. Producers on any thread push; the
// owning thread drains at a tick boundary.
//
//   producer threads ── push_back() ──┐
//                                     ▼
//                          L: Lock<VecDeque<T>>
//                                     │
//   logic thread  ◄──── drain() ──────┘
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::marker::PhantomData;

//=== Internal Dependencies ===============================================

use super::{Lock, Mutex};

//=== AsyncDeque ==========================================================

/// Lock-protected `VecDeque`, shareable behind an `Arc`.
///
/// The lock type defaults to [`Mutex`]; use a [`super::SpinLock`] for hot
/// queues with tiny critical sections.
pub struct AsyncDeque<T, L = Mutex<VecDeque<T>>> {
    inner: L,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AsyncDeque<T> {
    /// Creates an empty deque guarded by a [`Mutex`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, L: Lock<VecDeque<T>>> AsyncDeque<T, L> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: L::new(VecDeque::with_capacity(capacity)),
            _marker: PhantomData,
        }
    }

    //--- Producers --------------------------------------------------------

    pub fn push_back(&self, value: T) {
        self.inner.lock().push_back(value);
    }

    pub fn push_front(&self, value: T) {
        self.inner.lock().push_front(value);
    }

    //--- Consumers --------------------------------------------------------

    pub fn pop_front(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    pub fn pop_back(&self) -> Option<T> {
        self.inner.lock().pop_back()
    }

    /// Removes every queued value in front-to-back order.
    ///
    /// The lock is held only for the swap, never while the caller
    /// processes the returned values.
    pub fn drain(&self) -> Vec<T> {
        let taken = std::mem::take(&mut *self.inner.lock());
        taken.into()
    }

    //--- Queries ----------------------------------------------------------

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

impl<T, L: Lock<VecDeque<T>>> Default for AsyncDeque<T, L> {
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
    use crate::core::memory::SpinLock;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn behaves_as_deque() {
        let deque = AsyncDeque::new();
        deque.push_back(2);
        deque.push_back(3);
        deque.push_front(1);

        assert_eq!(deque.len(), 3);
        assert_eq!(deque.pop_front(), Some(1));
        assert_eq!(deque.pop_back(), Some(3));
        assert_eq!(deque.pop_front(), Some(2));
        assert_eq!(deque.pop_front(), None);
        assert!(deque.is_empty());
    }

    #[test]
    fn drain_preserves_fifo_order_and_empties() {
        let deque: AsyncDeque<u32> = AsyncDeque::new();
        for i in 0..5 {
            deque.push_back(i);
        }

        assert_eq!(deque.drain(), vec![0, 1, 2, 3, 4]);
        assert!(deque.is_empty());
        assert!(deque.drain().is_empty());
    }

    #[test]
    fn spin_locked_deque_collects_from_many_producers() {
        let deque: Arc<AsyncDeque<usize, SpinLock<VecDeque<usize>>>> =
            Arc::new(AsyncDeque::default());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let deque = Arc::clone(&deque);
                thread::spawn(move || {
                    for i in 0..250 {
                        deque.push_back(t * 1000 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut values = deque.drain();
        assert_eq!(values.len(), 1000);

        // Per-producer order is preserved
        values.retain(|v| v / 1000 == 2);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }
}
