//! Poll loop counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the poll thread, readable from any thread.
#[derive(Debug, Default)]
pub struct InputMetrics {
    /// Reads that returned data
    reads: AtomicU64,
    /// Reads that timed out, returned nothing, or failed
    empty_reads: AtomicU64,
    /// Bytes delivered to the decoder while active
    bytes_read: AtomicU64,
    /// Packets decoded while active
    packets_decoded: AtomicU64,
    /// Bytes read while suspended (decoded, not delivered)
    bytes_discarded: AtomicU64,
}

/// Point-in-time copy of [`InputMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reads: u64,
    pub empty_reads: u64,
    pub bytes_read: u64,
    pub packets_decoded: u64,
    pub bytes_discarded: u64,
}

impl InputMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_read(&self, bytes: usize, packets: usize) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
        self.packets_decoded
            .fetch_add(packets as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_empty_read(&self) {
        self.empty_reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_discarded(&self, bytes: usize) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_discarded
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            empty_reads: self.empty_reads.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            bytes_discarded: self.bytes_discarded.load(Ordering::Relaxed),
        }
    }
}
