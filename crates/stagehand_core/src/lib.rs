//! Stagehand Core Runtime
//!
//! Foundational primitives for a per-frame interactive application loop:
//!
//! - **Event Stream**: a frame-scoped, append-only binary record stream
//! - **State Dispatch**: named, independently activatable states driven
//!   once per frame
//! - **Name Hashing**: FNV-1a identity hashes so states are addressed
//!   without string storage
//!
//! # Example
//!
//! ```rust
//! use stagehand_core::{EventStream, State, StateCore, StateDispatcher};
//!
//! const BOOT_DONE: u32 = 1;
//!
//! struct Boot {
//!     core: StateCore,
//! }
//!
//! impl State for Boot {
//!     fn identity_hash(&self) -> u32 {
//!         self.core.hash()
//!     }
//!     fn is_active(&self) -> bool {
//!         self.core.is_active()
//!     }
//!     fn activate(&mut self) {
//!         self.core.activate();
//!     }
//!     fn deactivate(&mut self) {
//!         self.core.deactivate();
//!     }
//!     fn tick(&mut self, _dt: f32, events: &mut EventStream) {
//!         events.push(BOOT_DONE).ok();
//!     }
//! }
//!
//! let mut dispatcher = StateDispatcher::new();
//! dispatcher.add(Boot { core: StateCore::new("boot") });
//! dispatcher.activate("boot");
//!
//! dispatcher.tick(1.0 / 60.0);
//! assert!(dispatcher.contains_event_type(BOOT_DONE));
//!
//! // The stream is frame-scoped: the next tick starts empty.
//! dispatcher.deactivate("boot");
//! dispatcher.tick(1.0 / 60.0);
//! assert!(!dispatcher.has_events());
//! ```

pub mod dispatcher;
pub mod error;
pub mod hash;
pub mod state;
pub mod stream;

pub use dispatcher::StateDispatcher;
pub use error::StreamError;
pub use hash::fnv1a;
pub use state::{State, StateCore};
pub use stream::{EventStream, EventType, DEFAULT_CAPACITY};
