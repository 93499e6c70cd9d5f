//=========================================================================
// Input Buffer
//=========================================================================
//
// Collects one frame of input between two RedrawRequested events.
//
// - Discrete events (keys, pointer down/up) keep their order; an exact
//   repeat of the previous event is dropped.
// - Pointer moves are coalesced per pointer: a move replaces the pending
//   move of the same pointer unless a down/up for that pointer came in
//   between.
//
//=========================================================================

use crate::core::platform_bridge::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_continuous() {
            self.push_continuous(event);
        } else if self.events.last() != Some(&event) {
            self.events.push(event);
        }
    }

    fn push_continuous(&mut self, event: InputEvent) {
        let pointer = event.pointer();

        let last_for_pointer = self
            .events
            .iter()
            .rposition(|queued| queued.pointer().is_some() && queued.pointer() == pointer);

        match last_for_pointer {
            Some(index) if self.events[index].is_continuous() => self.events[index] = event,
            _ => self.events.push(event),
        }
    }

    /// Returns the frame's events, or `None` if nothing was buffered.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        let capacity = self.events.capacity();
        Some(std::mem::replace(
            &mut self.events,
            Vec::with_capacity(capacity),
        ))
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
