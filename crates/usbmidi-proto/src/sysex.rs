//! Per-cable System Exclusive reassembly.
//!
//! Each cable owns one append-only buffer. A terminating packet (CIN 5, 6 or 7) flushes
//! the accumulated bytes as one message and empties the buffer. There is no size cap:
//! a sender that never terminates grows its buffer without bound.

use crate::packet::{Cable, CABLE_COUNT};
use parking_lot::Mutex;

pub struct SysExAssembler {
    buffers: [Mutex<Vec<u8>>; CABLE_COUNT],
}

impl SysExAssembler {
    pub fn new() -> Self {
        Self {
            buffers: std::array::from_fn(|_| Mutex::new(Vec::new())),
        }
    }

    /// Appends continuation bytes (CIN 4) to the cable's buffer.
    #[inline]
    pub fn append(&self, cable: Cable, bytes: &[u8]) {
        self.buffers[cable.index()].lock().extend_from_slice(bytes);
    }

    /// Appends the terminating bytes and passes the complete message to `on_message`.
    ///
    /// The slot lock is held for the duration of `on_message`; the buffer is emptied
    /// afterwards but keeps its allocation.
    pub fn finish<F>(&self, cable: Cable, tail: &[u8], on_message: F)
    where
        F: FnOnce(&[u8]),
    {
        let mut buffer = self.buffers[cable.index()].lock();
        buffer.extend_from_slice(tail);
        on_message(&buffer);
        buffer.clear();
    }

    pub fn pending_len(&self, cable: Cable) -> usize {
        self.buffers[cable.index()].lock().len()
    }

    pub fn reset_all(&self) {
        for buffer in &self.buffers {
            buffer.lock().clear();
        }
    }
}

impl Default for SysExAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SysExAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending: Vec<usize> = self.buffers.iter().map(|b| b.lock().len()).collect();
        f.debug_struct("SysExAssembler")
            .field("pending", &pending)
            .finish()
    }
}
