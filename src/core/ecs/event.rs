//=========================================================================
// Events Manager
//=========================================================================
//
// Double-buffered, type-safe event bus.
//
// Architecture:
//   Systems       → publish<E>()  → pending<E>
//   Other threads → EventSender   → AsyncDeque ─┐
//                                               ↓
//   Engine ──────→ dispatch(): drain remote, swap pending → current,
//                              notify listeners
//                                               ↓
//   Systems       ← read<E>() (shared, until next dispatch)
//
// Events published during tick N are visible during tick N + 1.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::event_queue::{EventChannel, EventQueue};
use super::Event;
use crate::core::memory::{AsyncDeque, IdMap, SpinLock};

//=== ListenerId ==========================================================

/// Handle returned by [`EventsManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

//=== EventSender =========================================================

struct PostedEvent {
    type_id: TypeId,
    payload: Box<dyn Any + Send>,
    make_channel: fn() -> Box<dyn EventQueue>,
}

type RemoteQueue = AsyncDeque<PostedEvent, SpinLock<VecDeque<PostedEvent>>>;

/// Cloneable handle for publishing events from any thread.
///
/// Sent events are drained before the buffer swap, so they are readable
/// right after the next `dispatch`.
#[derive(Clone)]
pub struct EventSender {
    queue: Arc<RemoteQueue>,
}

impl EventSender {
    pub fn send<E: Event>(&self, event: E) {
        self.queue.push_back(PostedEvent {
            type_id: TypeId::of::<E>(),
            payload: Box::new(event),
            make_channel: EventChannel::<E>::boxed,
        });
    }
}

impl fmt::Debug for EventSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSender")
            .field("queued", &self.queue.len())
            .finish()
    }
}

//=== EventsManager =======================================================

/// Per-type event channels in registration order.
pub struct EventsManager {
    channels: Vec<Box<dyn EventQueue>>,
    index: HashMap<TypeId, usize>,
    listeners: IdMap<TypeId>,
    remote: Arc<RemoteQueue>,
}

impl EventsManager {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            index: HashMap::new(),
            listeners: IdMap::new(),
            remote: Arc::new(RemoteQueue::default()),
        }
    }

    //--- Channel Access ---------------------------------------------------

    fn channel_slot(&mut self, type_id: TypeId, make: fn() -> Box<dyn EventQueue>) -> usize {
        if let Some(&slot) = self.index.get(&type_id) {
            return slot;
        }
        let slot = self.channels.len();
        self.channels.push(make());
        self.index.insert(type_id, slot);
        slot
    }

    fn channel<E: Event>(&self) -> Option<&EventChannel<E>> {
        self.index
            .get(&TypeId::of::<E>())
            .and_then(|&slot| self.channels[slot].as_any().downcast_ref::<EventChannel<E>>())
    }

    fn channel_mut<E: Event>(&mut self) -> Option<&mut EventChannel<E>> {
        let slot = self.channel_slot(TypeId::of::<E>(), EventChannel::<E>::boxed);
        self.channels[slot]
            .as_any_mut()
            .downcast_mut::<EventChannel<E>>()
    }

    //--- Publishing -------------------------------------------------------

    /// Queues `event`; it becomes readable after the next `dispatch`.
    pub fn publish<E: Event>(&mut self, event: E) {
        if let Some(channel) = self.channel_mut::<E>() {
            channel.pending.push(event);
        }
    }

    /// Returns a handle for publishing from other threads.
    pub fn sender(&self) -> EventSender {
        EventSender {
            queue: Arc::clone(&self.remote),
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `listener` to run for each `E` made current by `dispatch`.
    pub fn subscribe<E, F>(&mut self, listener: F) -> ListenerId
    where
        E: Event,
        F: FnMut(&E) + Send + 'static,
    {
        let id = ListenerId(self.listeners.insert(TypeId::of::<E>()));
        if let Some(channel) = self.channel_mut::<E>() {
            channel.listeners.push((id, Box::new(listener)));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let Some(type_id) = self.listeners.remove(id.0) else {
            return false;
        };
        self.index
            .get(&type_id)
            .map(|&slot| self.channels[slot].remove_listener(id))
            .unwrap_or(false)
    }

    //--- Tick Boundary ----------------------------------------------------

    /// Advances every channel by one tick.
    ///
    /// Drains events posted through [`EventSender`]s into pending, swaps
    /// pending into current, then notifies listeners channel by channel in
    /// registration order. Returns the number of events made current.
    pub fn dispatch(&mut self) -> usize {
        for posted in self.remote.drain() {
            let slot = self.channel_slot(posted.type_id, posted.make_channel);
            if !self.channels[slot].push_boxed(posted.payload) {
                warn!(target: "ecs", "dropped remote event with mismatched type");
            }
        }

        let current: usize = self
            .channels
            .iter_mut()
            .map(|channel| channel.swap_buffers())
            .sum();

        for channel in self.channels.iter_mut() {
            channel.notify();
        }

        if current > 0 {
            trace!(target: "ecs", "dispatched {} events", current);
        }
        current
    }

    //--- Queries ----------------------------------------------------------

    /// Events of type `E` made current by the last `dispatch`.
    pub fn read<E: Event>(&self) -> &[E] {
        self.channel::<E>()
            .map(|channel| channel.current.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_events<E: Event>(&self) -> bool {
        !self.read::<E>().is_empty()
    }

    /// Events of type `E` published since the last `dispatch`.
    ///
    /// Does not include events still sitting in the cross-thread queue.
    pub fn pending_count<E: Event>(&self) -> usize {
        self.channel::<E>()
            .map(|channel| channel.pending_len())
            .unwrap_or(0)
    }

    /// Drops every current, pending and remote event. Listeners stay.
    pub fn clear(&mut self) {
        self.remote.clear();
        for channel in self.channels.iter_mut() {
            channel.clear();
        }
    }
}

impl Default for EventsManager {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
