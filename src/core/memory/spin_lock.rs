//=========================================================================
// SpinLock
//=========================================================================
//
// Busy-wait lock for critical sections of a few instructions (queue
// push/pop). Never hold a SpinLock guard across blocking calls.
//
// Acquire: compare_exchange(false → true, Acquire)
// Release: store(false, Release) in guard Drop
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::UnsafeCell;
use std::fmt;
use std::hint;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

//=== Internal Dependencies ===============================================

use super::Lock;

//=== SpinLock ============================================================

/// Spin lock owning a value of type `T`.
pub struct SpinLock<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: access to `value` is serialized through `locked`; only one guard
// exists at a time, so sharing the lock across threads is sound whenever
// the value itself may be sent between threads.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Returns true if some guard currently holds the lock.
    ///
    /// Only a hint: the answer may be stale by the time it is used.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }
}

impl<T> Lock<T> for SpinLock<T> {
    type Guard<'a> = SpinLockGuard<'a, T> where Self: 'a;

    fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    fn lock(&self) -> SpinLockGuard<'_, T> {
        loop {
            if self.try_acquire() {
                return SpinLockGuard::new(self);
            }
            // Spin on a plain load to keep the cache line shared
            while self.locked.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinLockGuard::new(self))
    }

    fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        <Self as Lock<T>>::new(T::default())
    }
}

impl<T> fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

//=== SpinLockGuard =======================================================

/// Exclusive access to a [`SpinLock`]'s value; unlocks on drop.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
    // Opts out of the auto Sync impl; see below.
    _not_sync: PhantomData<*const ()>,
}

impl<'a, T> SpinLockGuard<'a, T> {
    fn new(lock: &'a SpinLock<T>) -> Self {
        Self {
            lock,
            _not_sync: PhantomData,
        }
    }
}

// SAFETY: sharing the guard shares `&T`, which is only sound for `T: Sync`.
// Sending it releases the lock from another thread, which the atomic
// store permits.
unsafe impl<T: Sync> Sync for SpinLockGuard<'_, T> {}
unsafe impl<T: Send> Send for SpinLockGuard<'_, T> {}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard proves exclusive ownership of the lock.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard proves exclusive ownership of the lock.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
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
    fn guard_releases_on_drop() {
        let lock = SpinLock::new(1u32);
        {
            let mut guard = lock.lock();
            *guard += 1;
            assert!(lock.is_locked());
            assert!(lock.try_lock().is_none());
        }
        assert!(!lock.is_locked());
        assert_eq!(*lock.lock(), 2);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        const THREADS: usize = 4;
        const ITERATIONS: u64 = 10_000;

        let lock = Arc::new(SpinLock::new(0u64));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for _ in 0..ITERATIONS {
                        *lock.lock() += 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*lock.lock(), THREADS as u64 * ITERATIONS);
    }

    // Inherent methods win over trait methods, so `is_sync` reports true
    // only when the `T: Sync` bound holds.
    struct SyncCheck<T>(std::marker::PhantomData<T>);

    impl<T: Sync> SyncCheck<T> {
        fn is_sync(&self) -> bool {
            true
        }
    }

    trait Fallback {
        fn is_sync(&self) -> bool {
            false
        }
    }

    impl<T> Fallback for SyncCheck<T> {}

    #[test]
    fn guard_is_sync_only_for_sync_values() {
        use std::cell::Cell;

        assert!(SyncCheck::<SpinLockGuard<'static, u32>>(PhantomData).is_sync());
        assert!(!SyncCheck::<SpinLockGuard<'static, Cell<u32>>>(PhantomData).is_sync());
    }

    #[test]
    fn into_inner_returns_value() {
        let lock = SpinLock::new(vec!['b', 't']);
        assert_eq!(lock.into_inner(), vec!['b', 't']);
    }
}
