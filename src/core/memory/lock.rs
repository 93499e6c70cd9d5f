//=========================================================================
// Lock Abstraction
//=========================================================================
//
// Common interface over the engine's lock primitives so the async
// containers can be parameterized by locking strategy.
//
//   Lock<T>
//     ├─ Mutex<T>     (blocking, std-backed, poison-tolerant)
//     └─ SpinLock<T>  (busy-wait, for very short critical sections)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::DerefMut;
use std::sync::{MutexGuard, PoisonError, TryLockError};

use log::warn;

//=== Lock Trait ==========================================================

/// A lock owning a value of type `T`.
///
/// The guard returned by [`Lock::lock`] grants exclusive access and
/// releases the lock when dropped.
pub trait Lock<T> {
    /// Guard type granting exclusive access to `T`.
    type Guard<'a>: DerefMut<Target = T>
    where
        Self: 'a;

    /// Wraps `value` in a new unlocked lock.
    fn new(value: T) -> Self
    where
        Self: Sized;

    /// Acquires the lock, blocking or spinning until available.
    fn lock(&self) -> Self::Guard<'_>;

    /// Acquires the lock only if it is free right now.
    fn try_lock(&self) -> Option<Self::Guard<'_>>;

    /// Consumes the lock and returns the protected value.
    fn into_inner(self) -> T
    where
        Self: Sized;
}

//=== Mutex ===============================================================

/// Blocking mutex that never propagates poisoning.
///
/// A panic while holding the guard leaves the data in whatever state the
/// panicking code produced; later lockers get the data back along with a
/// warning in the log.
#[derive(Debug, Default)]
pub struct Mutex<T> {
    inner: std::sync::Mutex<T>,
}

impl<T> Lock<T> for Mutex<T> {
    type Guard<'a> = MutexGuard<'a, T> where Self: 'a;

    fn new(value: T) -> Self {
        Self {
            inner: std::sync::Mutex::new(value),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!(target: "memory", "Recovering poisoned mutex");
            poisoned.into_inner()
        })
    }

    fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        match self.inner.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!(target: "memory", "Recovering poisoned mutex");
                Some(poisoned.into_inner())
            }
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn into_inner(self) -> T {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

//=========================================================================
// Tests
//=========================================================================
