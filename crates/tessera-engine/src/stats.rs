//! Allocator statistics and teardown reports.

use tessera_arena::{ArenaStats, LedgerSnapshot};

/// Point-in-time view of a `Ready` allocator.
///
/// Each arena is read under its own lock in turn, so the per-arena entries
/// are individually consistent but not a global snapshot while other
/// threads are allocating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorStats {
    /// One entry per arena, in index order.
    pub arenas: Vec<ArenaStats>,
    /// Buffers currently held in the retired list.
    pub retired_buffers: usize,
    /// Bytes held by retired buffers.
    pub retired_bytes: usize,
    /// Memory ledger counters.
    pub ledger: LedgerSnapshot,
}

impl AllocatorStats {
    /// Allocations served across all arenas.
    pub fn total_allocations(&self) -> u64 {
        self.arenas.iter().map(|a| a.allocations).sum()
    }

    /// Resizes performed across all arenas.
    pub fn total_resizes(&self) -> u64 {
        self.arenas.iter().map(|a| a.resizes).sum()
    }

    /// Capacity of every arena's current buffer.
    pub fn current_capacity(&self) -> usize {
        self.arenas.iter().map(|a| a.capacity).sum()
    }
}

/// What `destroy` released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Arenas dismantled.
    pub arenas: usize,
    /// Current arena buffers released.
    pub current_buffers: usize,
    /// Retired buffers released.
    pub retired_buffers: usize,
    /// Bytes released across both kinds of buffer.
    pub bytes_released: usize,
}

impl TeardownReport {
    /// Total buffers released.
    pub fn buffers_released(&self) -> usize {
        self.current_buffers + self.retired_buffers
    }
}
