//! State capability contract
//!
//! A state is a named unit of per-frame behavior. The dispatcher addresses it
//! by the FNV-1a hash of its name, flips its active flag on activation, and
//! drives its tick/render callbacks while it is active. Multiple states may
//! be active at once; activation is not exclusive.

use crate::hash::fnv1a;
use crate::stream::EventStream;

/// A named, independently activatable unit of per-frame behavior.
///
/// Implementors usually embed a [`StateCore`] and delegate the identity and
/// activation methods to it, keeping only `tick`/`render` hand-written.
pub trait State {
    /// Hash of the state's name, derived once at construction.
    fn identity_hash(&self) -> u32;

    /// Whether the state currently receives tick/render calls.
    fn is_active(&self) -> bool;

    /// Mark the state active. Idempotent: activating an active state is a
    /// no-op.
    fn activate(&mut self);

    /// Mark the state inactive. Idempotent.
    fn deactivate(&mut self);

    /// Advance the state by `dt` seconds.
    ///
    /// `events` is the frame's shared stream: anything pushed here is
    /// visible to later-ticked states and to the host until the next frame
    /// begins.
    fn tick(&mut self, dt: f32, events: &mut EventStream);

    /// Draw the state. Called once per frame, after all ticks.
    fn render(&mut self) {}
}

/// Identity and activation flag shared by every state.
///
/// The hash is derived from the name at construction and never changes; the
/// flag starts inactive. Implementors embed this as a plain value and
/// delegate the identity/activation methods of [`State`] to it.
#[derive(Debug, Clone, Copy)]
pub struct StateCore {
    hash: u32,
    active: bool,
}

impl StateCore {
    /// Derive the identity hash from `name`; the state starts inactive.
    pub fn new(name: &str) -> Self {
        Self {
            hash: fnv1a(name),
            active: false,
        }
    }

    pub const fn hash(&self) -> u32 {
        self.hash
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive_with_name_hash() {
        let core = StateCore::new("Intro");
        assert!(!core.is_active());
        assert_eq!(core.hash(), fnv1a("Intro"));
    }

    #[test]
    fn activation_is_idempotent() {
        let mut core = StateCore::new("Intro");

        core.activate();
        core.activate();
        assert!(core.is_active());

        core.deactivate();
        core.deactivate();
        assert!(!core.is_active());
    }
}
