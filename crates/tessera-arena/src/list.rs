//! Fixed-cardinality arena list.
//!
//! [`ArenaList`] is built once at `init` with every arena backed by a
//! buffer of the same default size. Its length never changes afterwards;
//! routing indexes into it by position.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tessera_core::{AllocError, ArenaIndex};

use crate::arena::{Arena, ArenaStats};
use crate::buffer::Buffer;
use crate::ledger::MemoryLedger;

/// What tearing down an [`ArenaList`] released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Arenas dismantled.
    pub arenas: usize,
    /// Current backing buffers released (one per arena).
    pub buffers: usize,
    /// Bytes released with those buffers.
    pub bytes: usize,
}

/// An ordered, immutable sequence of arenas.
pub struct ArenaList {
    arenas: Vec<Arena>,
    count: NonZeroUsize,
    arena_size: usize,
}

impl ArenaList {
    /// Build `count` arenas, each with a fresh `arena_size`-byte buffer.
    ///
    /// If any buffer cannot be acquired, the buffers already acquired are
    /// released and [`AllocError::OutOfMemory`] is returned.
    pub fn new(
        arena_size: usize,
        count: NonZeroUsize,
        ledger: &Arc<MemoryLedger>,
    ) -> Result<Self, AllocError> {
        let arenas = (0..count.get())
            .map(|i| Buffer::acquire(arena_size, ledger).map(|b| Arena::new(ArenaIndex(i), b)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            arenas,
            count,
            arena_size,
        })
    }

    /// Number of arenas. Fixed at construction.
    pub fn len(&self) -> NonZeroUsize {
        self.count
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.arenas.is_empty()
    }

    /// Initial buffer size each arena was built with.
    pub fn arena_size(&self) -> usize {
        self.arena_size
    }

    /// Positional lookup.
    pub fn get(&self, index: ArenaIndex) -> Option<&Arena> {
        self.arenas.get(index.0)
    }

    /// Lookup that reduces `index` modulo the arena count.
    ///
    /// Used on the allocation path so an out-of-range index from a custom
    /// router still lands on a real arena.
    pub fn arena_for(&self, index: ArenaIndex) -> &Arena {
        &self.arenas[index.0 % self.arenas.len()]
    }

    /// Iterate arenas in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Arena> {
        self.arenas.iter()
    }

    /// Stats for every arena, in index order.
    pub fn stats(&self) -> Vec<ArenaStats> {
        self.arenas.iter().map(Arena::stats).collect()
    }

    /// Dismantle every arena and release its current buffer.
    pub fn release(self) -> ReleaseSummary {
        let mut summary = ReleaseSummary::default();
        for arena in self.arenas {
            let buffer = arena.into_buffer();
            summary.arenas += 1;
            summary.buffers += 1;
            summary.bytes += buffer.capacity();
        }
        summary
    }
}
