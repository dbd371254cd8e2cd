//! Frame-scoped event stream
//!
//! An append-only binary blob that carries typed, variable-length event
//! records from active states to the rest of the frame. Records are written
//! back-to-back into a fixed-capacity arena; an offset table gives O(1)
//! positional lookup. The owning dispatcher resets the stream at the start of
//! every frame, so records never outlive the frame they were pushed in.
//!
//! The stream never interprets payload bytes. Callers that want typed
//! payloads use [`EventStream::push_value`] / [`EventStream::read_value`],
//! which go through `bytemuck` instead of interpreting memory in place.

use crate::error::StreamError;
use smallvec::SmallVec;
use std::mem::size_of;

/// Identifier for an event type.
pub type EventType = u32;

/// Default arena capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Bytes occupied by a record header: sequence id (`u32`), type (`u32`),
/// payload length (`usize`).
pub const HEADER_SIZE: usize = 2 * size_of::<u32>() + size_of::<usize>();

/// Append-only event record stream backed by a fixed-capacity byte arena.
///
/// Each record is `{sequence id, type, size, payload}` stored inline with no
/// padding. The sequence id equals the record's 0-based insertion position
/// within the current frame. [`reset`](Self::reset) rewinds the write cursor
/// without releasing or shrinking the arena, so a steady-state frame performs
/// no allocation.
pub struct EventStream {
    data: Box<[u8]>,
    mappings: SmallVec<[usize; 16]>,
    cursor: usize,
}

impl EventStream {
    /// Create a stream with the default 4096-byte arena.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a stream with an arena of `capacity` bytes.
    ///
    /// The capacity is fixed for the life of the stream; a push that would
    /// exceed it is rejected with [`StreamError::CapacityExceeded`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            mappings: SmallVec::new(),
            cursor: 0,
        }
    }

    /// Discard all records and rewind the write cursor.
    ///
    /// Idempotent. Indices obtained before a reset must not be reused: they
    /// now address records of a frame that no longer exists.
    pub fn reset(&mut self) {
        self.mappings.clear();
        self.cursor = 0;
    }

    /// Append a record with no payload.
    pub fn push(&mut self, event_type: EventType) -> Result<(), StreamError> {
        self.push_with(event_type, &[])
    }

    /// Append a record carrying `payload` verbatim.
    ///
    /// On [`StreamError::CapacityExceeded`] the stream is left untouched:
    /// prior records stay intact and readable.
    pub fn push_with(&mut self, event_type: EventType, payload: &[u8]) -> Result<(), StreamError> {
        let needed = HEADER_SIZE + payload.len();
        if needed > self.data.len() - self.cursor {
            return Err(StreamError::CapacityExceeded {
                needed,
                capacity: self.data.len(),
                used: self.cursor,
            });
        }

        let offset = self.cursor;
        let sequence_id = self.mappings.len() as u32;
        self.data[offset..offset + 4].copy_from_slice(&sequence_id.to_le_bytes());
        self.data[offset + 4..offset + 8].copy_from_slice(&event_type.to_le_bytes());
        self.data[offset + 8..offset + HEADER_SIZE].copy_from_slice(&payload.len().to_le_bytes());
        self.data[offset + HEADER_SIZE..offset + needed].copy_from_slice(payload);

        self.mappings.push(offset);
        self.cursor += needed;
        Ok(())
    }

    /// Append a record whose payload is the raw bytes of `value`.
    pub fn push_value<T: bytemuck::NoUninit>(
        &mut self,
        event_type: EventType,
        value: &T,
    ) -> Result<(), StreamError> {
        self.push_with(event_type, bytemuck::bytes_of(value))
    }

    /// Payload bytes of the record at `index` (0-based, insertion order).
    ///
    /// The returned slice borrows the arena and is valid until the next
    /// reset; callers that need the bytes beyond the frame copy them out.
    pub fn payload(&self, index: usize) -> Result<&[u8], StreamError> {
        let offset = self.lookup(index)?;
        let size = read_usize(&self.data, offset + 8);
        let start = offset + HEADER_SIZE;
        Ok(&self.data[start..start + size])
    }

    /// Type tag of the record at `index`.
    pub fn event_type(&self, index: usize) -> Result<EventType, StreamError> {
        let offset = self.lookup(index)?;
        Ok(read_u32(&self.data, offset + 4))
    }

    /// Decode the payload at `index` as a `T`.
    ///
    /// Fails with [`StreamError::PayloadSizeMismatch`] unless the stored
    /// payload is exactly `size_of::<T>()` bytes.
    pub fn read_value<T: bytemuck::AnyBitPattern>(&self, index: usize) -> Result<T, StreamError> {
        let bytes = self.payload(index)?;
        if bytes.len() != size_of::<T>() {
            return Err(StreamError::PayloadSizeMismatch {
                expected: size_of::<T>(),
                actual: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Whether any record of the current frame carries `event_type`.
    ///
    /// Linear scan over the frame's records; false on an empty stream.
    pub fn contains(&self, event_type: EventType) -> bool {
        self.mappings
            .iter()
            .any(|&offset| read_u32(&self.data, offset + 4) == event_type)
    }

    /// Number of records pushed since the last reset.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the current frame has no records.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Arena capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Iterate over `(type, payload)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EventType, &[u8])> {
        self.mappings.iter().map(|&offset| {
            let size = read_usize(&self.data, offset + 8);
            let start = offset + HEADER_SIZE;
            (read_u32(&self.data, offset + 4), &self.data[start..start + size])
        })
    }

    fn lookup(&self, index: usize) -> Result<usize, StreamError> {
        self.mappings
            .get(index)
            .copied()
            .ok_or(StreamError::IndexOutOfRange {
                index,
                len: self.mappings.len(),
            })
    }
}

impl Default for EventStream {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn read_usize(data: &[u8], offset: usize) -> usize {
    let mut bytes = [0u8; size_of::<usize>()];
    bytes.copy_from_slice(&data[offset..offset + size_of::<usize>()]);
    usize::from_le_bytes(bytes)
}
