//=========================================================================
// Event Queue Trait
//=========================================================================
//
// Type-erased per-type event channel. Lets the EventsManager swap
// buffers, notify listeners and accept events posted from other threads
// without knowing the concrete event type.
//
//   publish ──► pending ──swap──► current ──► listeners / read()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::{Event, ListenerId};

//=========================================================================

pub(super) type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Type-erased operations over an [`EventChannel`].
pub(super) trait EventQueue: Send {
    /// Makes pending events current, dropping the previous current set.
    ///
    /// Returns the number of events made current.
    fn swap_buffers(&mut self) -> usize;

    /// Invokes every listener for every current event.
    fn notify(&mut self);

    /// Queues a boxed event. Returns `false` on a type mismatch.
    fn push_boxed(&mut self, event: Box<dyn Any + Send>) -> bool;

    fn remove_listener(&mut self, id: ListenerId) -> bool;

    fn pending_len(&self) -> usize;

    /// Drops current and pending events, keeping listeners.
    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== EventChannel ========================================================

pub(super) struct EventChannel<E> {
    pub(super) current: Vec<E>,
    pub(super) pending: Vec<E>,
    pub(super) listeners: Vec<(ListenerId, Listener<E>)>,
}

impl<E: Event> EventChannel<E> {
    pub(super) fn new() -> Self {
        Self {
            current: Vec::new(),
            pending: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Constructor usable as a plain `fn` pointer by remote senders.
    pub(super) fn boxed() -> Box<dyn EventQueue> {
        Box::new(Self::new())
    }
}

impl<E: Event> EventQueue for EventChannel<E> {
    fn swap_buffers(&mut self) -> usize {
        self.current.clear(); // keeps capacity for the next swap
        std::mem::swap(&mut self.current, &mut self.pending);
        self.current.len()
    }

    fn notify(&mut self) {
        for event in &self.current {
            for (_, listener) in self.listeners.iter_mut() {
                listener(event);
            }
        }
    }

    fn push_boxed(&mut self, event: Box<dyn Any + Send>) -> bool {
        match event.downcast::<E>() {
            Ok(event) => {
                self.pending.push(*event);
                true
            }
            Err(_) => false,
        }
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn clear(&mut self) {
        self.current.clear();
        self.pending.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_moves_pending_to_current_and_keeps_capacity() {
        let mut channel = EventChannel::<u32>::new();
        for i in 0..32 {
            channel.pending.push(i);
        }

        assert_eq!(channel.swap_buffers(), 32);
        assert_eq!(channel.current.len(), 32);
        assert!(channel.pending.is_empty());

        // previous current buffer becomes the new pending one
        assert_eq!(channel.swap_buffers(), 0);
        assert!(channel.pending.capacity() >= 32);
    }

    #[test]
    fn push_boxed_rejects_wrong_type() {
        let mut channel = EventChannel::<u32>::new();
        let queue: &mut dyn EventQueue = &mut channel;

        assert!(queue.push_boxed(Box::new(7u32)));
        assert!(!queue.push_boxed(Box::new("seven")));
        assert_eq!(queue.pending_len(), 1);
    }
}
