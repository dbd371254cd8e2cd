//! State dispatcher
//!
//! Owns the registered states and the frame's event stream, and drives the
//! per-frame cycle: reset the stream, tick every active state in
//! registration order, then render. States are addressed by the FNV-1a hash
//! of their name; registration order is significant and permanent (states
//! are never removed).

use crate::hash::fnv1a;
use crate::state::State;
use crate::stream::{EventStream, EventType};
use crate::StreamError;
use tracing::{trace, warn};

/// Drives a set of named states and owns the frame-scoped [`EventStream`].
///
/// This is a parallel-composition dispatcher: any number of states may be
/// active at once, and every active state ticks each frame against the same
/// shared stream, so a later-ticked state (or the host, after the tick) can
/// observe events pushed earlier in the frame.
pub struct StateDispatcher {
    states: Vec<Box<dyn State>>,
    stream: EventStream,
}

impl StateDispatcher {
    /// Create a dispatcher with the default event stream capacity.
    pub fn new() -> Self {
        Self::with_event_capacity(crate::stream::DEFAULT_CAPACITY)
    }

    /// Create a dispatcher whose event stream arena holds `bytes` bytes.
    pub fn with_event_capacity(bytes: usize) -> Self {
        Self {
            states: Vec::new(),
            stream: EventStream::with_capacity(bytes),
        }
    }

    /// Register a state, taking ownership. Appended to the end of the
    /// registration order.
    ///
    /// No duplicate-name detection is performed; if two registered names
    /// hash to the same identity, name lookups resolve to whichever state
    /// was registered first.
    pub fn add<S: State + 'static>(&mut self, state: S) {
        self.states.push(Box::new(state));
    }

    /// Activate the first registered state whose name hashes to `name`.
    ///
    /// Unknown names are a no-op (logged, not an error).
    pub fn activate(&mut self, name: &str) {
        match self.find_mut(name) {
            Some(state) => state.activate(),
            None => warn!(name, "activate: no state registered under this name"),
        }
    }

    /// Deactivate the first registered state whose name hashes to `name`.
    ///
    /// Unknown names are a no-op (logged, not an error).
    pub fn deactivate(&mut self, name: &str) {
        match self.find_mut(name) {
            Some(state) => state.deactivate(),
            None => warn!(name, "deactivate: no state registered under this name"),
        }
    }

    /// Whether the state registered under `name` is currently active.
    ///
    /// False for unknown names.
    pub fn is_active(&self, name: &str) -> bool {
        let hash = fnv1a(name);
        self.states
            .iter()
            .find(|state| state.identity_hash() == hash)
            .is_some_and(|state| state.is_active())
    }

    /// Advance one frame: reset the event stream, then tick every active
    /// state in registration order against the shared stream.
    ///
    /// `dt` is the caller-supplied elapsed time in seconds; the dispatcher
    /// keeps no clock of its own. Events pushed during this call stay
    /// readable until the next `tick`.
    pub fn tick(&mut self, dt: f32) {
        trace!(dt, "frame tick");
        self.stream.reset();
        for state in self.states.iter_mut() {
            if state.is_active() {
                state.tick(dt, &mut self.stream);
            }
        }
    }

    /// Render every active state in registration order.
    pub fn render(&mut self) {
        for state in self.states.iter_mut() {
            if state.is_active() {
                state.render();
            }
        }
    }

    /// Whether the current frame produced any events.
    pub fn has_events(&self) -> bool {
        !self.stream.is_empty()
    }

    /// Number of events in the current frame.
    pub fn num_events(&self) -> usize {
        self.stream.len()
    }

    /// Payload bytes of the frame's `index`-th event.
    pub fn event(&self, index: usize) -> Result<&[u8], StreamError> {
        self.stream.payload(index)
    }

    /// Type tag of the frame's `index`-th event.
    pub fn event_type(&self, index: usize) -> Result<EventType, StreamError> {
        self.stream.event_type(index)
    }

    /// Decode the payload of the frame's `index`-th event as a `T`.
    pub fn read_event<T: bytemuck::AnyBitPattern>(&self, index: usize) -> Result<T, StreamError> {
        self.stream.read_value(index)
    }

    /// Whether any event of the current frame carries `event_type`.
    pub fn contains_event_type(&self, event_type: EventType) -> bool {
        self.stream.contains(event_type)
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states have been registered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Box<dyn State>> {
        let hash = fnv1a(name);
        self.states
            .iter_mut()
            .find(|state| state.identity_hash() == hash)
    }
}

impl Default for StateDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateCore;
    use std::sync::{Arc, Mutex};

    // Event types for tests
    const PING: EventType = 1;
    const PONG: EventType = 2;

    /// Counts tick/render calls and optionally pushes one event per tick.
    struct Spy {
        core: StateCore,
        ticks: Arc<Mutex<u32>>,
        renders: Arc<Mutex<u32>>,
        emits: Option<(EventType, Vec<u8>)>,
    }

    impl Spy {
        fn new(name: &str, emits: Option<(EventType, Vec<u8>)>) -> (Self, Arc<Mutex<u32>>, Arc<Mutex<u32>>) {
            let ticks = Arc::new(Mutex::new(0));
            let renders = Arc::new(Mutex::new(0));
            let spy = Self {
                core: StateCore::new(name),
                ticks: ticks.clone(),
                renders: renders.clone(),
                emits,
            };
            (spy, ticks, renders)
        }
    }

    impl State for Spy {
        fn identity_hash(&self) -> u32 {
            self.core.hash()
        }

        fn is_active(&self) -> bool {
            self.core.is_active()
        }

        fn activate(&mut self) {
            self.core.activate();
        }

        fn deactivate(&mut self) {
            self.core.deactivate();
        }

        fn tick(&mut self, _dt: f32, events: &mut EventStream) {
            *self.ticks.lock().unwrap() += 1;
            if let Some((event_type, payload)) = &self.emits {
                events.push_with(*event_type, payload).unwrap();
            }
        }

        fn render(&mut self) {
            *self.renders.lock().unwrap() += 1;
        }
    }

    #[test]
    fn only_active_states_tick_and_render() {
        let (a, a_ticks, a_renders) = Spy::new("A", None);
        let (b, b_ticks, b_renders) = Spy::new("B", None);

        let mut dispatcher = StateDispatcher::new();
        dispatcher.add(a);
        dispatcher.add(b);
        dispatcher.activate("A");

        dispatcher.tick(0.016);
        dispatcher.render();

        assert_eq!(*a_ticks.lock().unwrap(), 1);
        assert_eq!(*a_renders.lock().unwrap(), 1);
        assert_eq!(*b_ticks.lock().unwrap(), 0);
        assert_eq!(*b_renders.lock().unwrap(), 0);
    }

    #[test]
    fn activation_is_idempotent() {
        let (a, a_ticks, _) = Spy::new("A", None);

        let mut dispatcher = StateDispatcher::new();
        dispatcher.add(a);

        dispatcher.activate("A");
        dispatcher.activate("A");
        assert!(dispatcher.is_active("A"));

        // Still exactly one tick per frame
        dispatcher.tick(0.016);
        assert_eq!(*a_ticks.lock().unwrap(), 1);
    }

    #[test]
    fn unknown_names_are_a_no_op() {
        let (a, _, _) = Spy::new("A", None);

        let mut dispatcher = StateDispatcher::new();
        dispatcher.add(a);

        dispatcher.activate("Missing");
        dispatcher.deactivate("Missing");
        assert!(!dispatcher.is_active("Missing"));
        assert!(!dispatcher.is_active("A"));
    }

    #[test]
    fn duplicate_names_resolve_to_first_registration() {
        let (first, first_ticks, _) = Spy::new("Menu", None);
        let (second, second_ticks, _) = Spy::new("Menu", None);

        let mut dispatcher = StateDispatcher::new();
        dispatcher.add(first);
        dispatcher.add(second);

        dispatcher.activate("Menu");
        dispatcher.tick(0.016);

        assert_eq!(*first_ticks.lock().unwrap(), 1);
        assert_eq!(*second_ticks.lock().unwrap(), 0);
    }

    #[test]
    fn events_accumulate_across_active_states_in_order() {
        let (a, _, _) = Spy::new("A", Some((PING, vec![0xA0])));
        let (b, _, _) = Spy::new("B", Some((PONG, vec![0xB0, 0xB1])));

        let mut dispatcher = StateDispatcher::new();
        dispatcher.add(a);
        dispatcher.add(b);
        dispatcher.activate("A");
        dispatcher.activate("B");

        dispatcher.tick(0.016);

        assert!(dispatcher.has_events());
        assert_eq!(dispatcher.num_events(), 2);
        assert_eq!(dispatcher.event_type(0), Ok(PING));
        assert_eq!(dispatcher.event(0), Ok(&[0xA0][..]));
        assert_eq!(dispatcher.event_type(1), Ok(PONG));
        assert_eq!(dispatcher.event(1), Ok(&[0xB0, 0xB1][..]));
        assert!(dispatcher.contains_event_type(PING));
        assert!(dispatcher.contains_event_type(PONG));
    }

    #[test]
    fn tick_resets_the_previous_frame() {
        let (a, _, _) = Spy::new("A", Some((PING, vec![])));

        let mut dispatcher = StateDispatcher::new();
        dispatcher.add(a);
        dispatcher.activate("A");

        dispatcher.tick(0.016);
        assert_eq!(dispatcher.num_events(), 1);

        dispatcher.deactivate("A");
        dispatcher.tick(0.016);
        assert_eq!(dispatcher.num_events(), 0);
        assert!(!dispatcher.has_events());
        assert_eq!(
            dispatcher.event_type(0),
            Err(StreamError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn registration_queries() {
        let mut dispatcher = StateDispatcher::new();
        assert!(dispatcher.is_empty());

        let (a, _, _) = Spy::new("A", None);
        dispatcher.add(a);
        assert_eq!(dispatcher.len(), 1);
        assert!(!dispatcher.is_empty());
    }
}
