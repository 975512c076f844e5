//! Single-slot response mailbox.
//!
//! The transport only supports pull-style reads of the current value, so
//! each command's response overwrites the slot and every read returns it
//! unchanged. Two writes before a read lose the first response; the
//! channel is request/response, not a stream.

/// Holder of the most recent response payload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseMailbox {
    slot: Vec<u8>,
    writes: u64,
}

impl ResponseMailbox {
    /// Empty mailbox; reads return an empty payload until the first write.
    pub const fn new() -> Self {
        Self {
            slot: Vec::new(),
            writes: 0,
        }
    }

    /// Replace the slot content.
    pub fn write(&mut self, payload: Vec<u8>) {
        self.slot = payload;
        self.writes = self.writes.wrapping_add(1);
    }

    /// Current content, left in place.
    pub fn read(&self) -> &[u8] {
        &self.slot
    }

    /// Number of writes since construction.
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}
