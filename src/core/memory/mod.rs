//=========================================================================
// Memory & Containers
//=========================================================================
//
// Lock primitives and the containers built on them.
//
//   Lock<T> ── Mutex<T> / SpinLock<T>
//      │
//      ├─ AsyncDeque   (cross-thread queues)
//      ├─ AsyncVector  (worker result sinks)
//      └─ AsyncMap     (shared caches)
//
//   IdMap     (monotonic ids, never reused)
//   IdVector  (generational slots, reused)
//
//=========================================================================

//=== Module Declarations =================================================

mod async_deque;
mod async_map;
mod async_vector;
mod id_map;
mod id_vector;
mod lock;
mod spin_lock;

//=== Public API ==========================================================

pub use async_deque::AsyncDeque;
pub use async_map::AsyncMap;
pub use async_vector::AsyncVector;
pub use id_map::IdMap;
pub use id_vector::{IdVector, SlotId};
pub use lock::{Lock, Mutex};
pub use spin_lock::{SpinLock, SpinLockGuard};
