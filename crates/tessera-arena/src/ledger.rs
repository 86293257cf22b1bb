//! Acquisition/release accounting shared by every buffer of one allocator.
//!
//! [`MemoryLedger`] counts buffers and bytes as they are acquired and
//! released, and optionally enforces a cap on live bytes. Each
//! [`Buffer`](crate::Buffer) holds an `Arc` to its ledger and reports its
//! own release from `Drop`, so teardown completeness can be verified by
//! counting alone.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Shared memory accounting for one allocator.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    /// Cap on `live_bytes`, if any.
    limit: Option<usize>,
    buffers_acquired: AtomicU64,
    buffers_released: AtomicU64,
    bytes_acquired: AtomicU64,
    bytes_released: AtomicU64,
    /// Bytes reserved or held by live buffers.
    live_bytes: AtomicUsize,
    peak_live_bytes: AtomicUsize,
}

impl MemoryLedger {
    /// Create a ledger with no memory limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that refuses reservations beyond `limit` live bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// The configured live-byte cap.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Reserve `bytes` of live capacity ahead of a system allocation.
    ///
    /// Returns `false` if the reservation would overflow or exceed the
    /// limit. A successful reservation must be followed by either
    /// [`commit_acquire`](Self::commit_acquire) or
    /// [`cancel_reservation`](Self::cancel_reservation).
    pub(crate) fn reserve(&self, bytes: usize) -> bool {
        let mut current = self.live_bytes.load(Ordering::Relaxed);
        loop {
            let Some(next) = current.checked_add(bytes) else {
                return false;
            };
            if self.limit.is_some_and(|limit| next > limit) {
                return false;
            }
            match self.live_bytes.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.peak_live_bytes.fetch_max(next, Ordering::Relaxed);
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Undo a reservation whose system allocation failed.
    pub(crate) fn cancel_reservation(&self, bytes: usize) {
        self.live_bytes.fetch_sub(bytes, Ordering::AcqRel);
    }

    /// Record a buffer acquisition against an existing reservation.
    pub(crate) fn commit_acquire(&self, bytes: usize) {
        self.buffers_acquired.fetch_add(1, Ordering::Relaxed);
        self.bytes_acquired.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a buffer release.
    pub(crate) fn record_release(&self, bytes: usize) {
        self.live_bytes.fetch_sub(bytes, Ordering::AcqRel);
        self.buffers_released.fetch_add(1, Ordering::Relaxed);
        self.bytes_released.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Bytes currently held by live buffers.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Acquire)
    }

    /// Point-in-time copy of every counter.
    ///
    /// Counters are read individually, so a snapshot taken while other
    /// threads are resizing may be mutually inconsistent by one event.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            buffers_acquired: self.buffers_acquired.load(Ordering::Relaxed),
            buffers_released: self.buffers_released.load(Ordering::Relaxed),
            bytes_acquired: self.bytes_acquired.load(Ordering::Relaxed),
            bytes_released: self.bytes_released.load(Ordering::Relaxed),
            live_bytes: self.live_bytes.load(Ordering::Acquire),
            peak_live_bytes: self.peak_live_bytes.load(Ordering::Relaxed),
        }
    }
}

/// Counter values read from a [`MemoryLedger`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Buffers ever acquired.
    pub buffers_acquired: u64,
    /// Buffers ever released.
    pub buffers_released: u64,
    /// Bytes ever acquired.
    pub bytes_acquired: u64,
    /// Bytes ever released.
    pub bytes_released: u64,
    /// Bytes held by live buffers.
    pub live_bytes: usize,
    /// Highest `live_bytes` ever observed.
    pub peak_live_bytes: usize,
}

impl LedgerSnapshot {
    /// Buffers acquired but not yet released.
    pub fn live_buffers(&self) -> u64 {
        self.buffers_acquired - self.buffers_released
    }

    /// Whether every acquired buffer and byte has been released.
    pub fn is_balanced(&self) -> bool {
        self.buffers_acquired == self.buffers_released
            && self.bytes_acquired == self.bytes_released
            && self.live_bytes == 0
    }
}
