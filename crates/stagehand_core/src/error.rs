//! Error types for the event stream.

use thiserror::Error;

/// Errors returned by [`EventStream`](crate::EventStream) operations.
///
/// All of these are contract violations local to a single call: a failed
/// push or read never disturbs records already in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The record's header plus payload does not fit in the remaining arena.
    #[error("event of {needed} bytes exceeds stream capacity ({used}/{capacity} bytes used)")]
    CapacityExceeded {
        needed: usize,
        capacity: usize,
        used: usize,
    },

    /// Positional lookup past the last record of the current frame.
    #[error("event index {index} out of range ({len} events this frame)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Typed read of a payload whose stored size does not match the target type.
    #[error("payload is {actual} bytes, expected {expected}")]
    PayloadSizeMismatch { expected: usize, actual: usize },
}
