//! A single independently-locked bump arena.
//!
//! An [`Arena`] owns one backing [`Buffer`] at a time and hands out
//! consecutive byte ranges from it. The buffer, the bump cursor and the
//! remaining-byte count are guarded together by the arena's own mutex;
//! nothing outside [`Arena::allocate`] and [`Arena::stats`] touches them.

use std::sync::{Arc, Mutex, PoisonError};

use tessera_core::{AllocError, ArenaIndex};
use tracing::{trace, warn};

use crate::block::Block;
use crate::buffer::Buffer;
use crate::ledger::MemoryLedger;
use crate::retired::RetiredList;

/// Replacement buffers are `GROWTH_FACTOR` times the request that
/// triggered them.
pub const GROWTH_FACTOR: usize = 2;

/// Mutable arena state, guarded as one unit.
///
/// Invariant: `remaining == top.capacity() - cursor` outside the lock.
struct ArenaState {
    /// Current backing buffer.
    top: Buffer,
    /// Bump pointer: offset of the next free byte in `top`.
    cursor: usize,
    /// Bytes left in `top`.
    remaining: usize,
    /// Successful allocations served.
    allocations: u64,
    /// Buffer replacements performed.
    resizes: u64,
}

/// Point-in-time view of one arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// The arena's position in its list.
    pub index: ArenaIndex,
    /// Capacity of the current backing buffer in bytes.
    pub capacity: usize,
    /// Bytes handed out from the current buffer.
    pub used: usize,
    /// Bytes left in the current buffer.
    pub remaining: usize,
    /// Successful allocations served over the arena's lifetime.
    pub allocations: u64,
    /// Buffer replacements over the arena's lifetime.
    pub resizes: u64,
}

/// An independently-locked bump-pointer sub-allocator.
pub struct Arena {
    index: ArenaIndex,
    state: Mutex<ArenaState>,
}

impl Arena {
    /// Create an arena over an already-acquired initial buffer.
    pub fn new(index: ArenaIndex, initial: Buffer) -> Self {
        let remaining = initial.capacity();
        Self {
            index,
            state: Mutex::new(ArenaState {
                top: initial,
                cursor: 0,
                remaining,
                allocations: 0,
                resizes: 0,
            }),
        }
    }

    /// This arena's position in its list.
    pub fn index(&self) -> ArenaIndex {
        self.index
    }

    /// Bump-allocate `size` bytes under this arena's lock.
    ///
    /// If `size` exceeds the remaining space, a new buffer of
    /// `GROWTH_FACTOR * size` bytes is acquired first and the current one
    /// is appended to `retired`. If that acquisition fails the arena is
    /// left untouched and [`AllocError::OutOfMemory`] is returned.
    ///
    /// The block borrows `retired` as well as the arena: a resize moves the
    /// memory it points into onto that list, so the list cannot be drained
    /// while the block is alive.
    pub fn allocate<'a>(
        &'a self,
        size: usize,
        retired: &'a RetiredList,
        ledger: &Arc<MemoryLedger>,
    ) -> Result<Block<'a>, AllocError> {
        if size == 0 {
            return Err(AllocError::ZeroSize);
        }
        let mut state = self.state.lock().map_err(|_| {
            warn!(arena = %self.index, "arena lock poisoned");
            AllocError::ArenaPoisoned { arena: self.index }
        })?;

        if size > state.remaining {
            let Some(capacity) = size.checked_mul(GROWTH_FACTOR) else {
                warn!(arena = %self.index, requested = size, "growth overflows usize");
                return Err(AllocError::OutOfMemory {
                    requested: usize::MAX,
                });
            };
            let fresh = Buffer::acquire(capacity, ledger).inspect_err(|_| {
                warn!(arena = %self.index, capacity, requested = size, "buffer acquisition failed");
            })?;
            let old = std::mem::replace(&mut state.top, fresh);
            trace!(
                arena = %self.index,
                old_capacity = old.capacity(),
                new_capacity = capacity,
                requested = size,
                "arena resized"
            );
            retired.append(self.index, old);
            state.cursor = 0;
            state.remaining = capacity;
            state.resizes += 1;
        }

        let region = state.top.region(state.cursor, size);
        state.cursor += size;
        state.remaining -= size;
        state.allocations += 1;
        Ok(Block::new(region, self.index))
    }

    /// Read this arena's counters.
    ///
    /// Takes the arena lock briefly. A poisoned lock is read through: the
    /// state is never left half-updated because nothing in the critical
    /// section can panic between paired field updates.
    pub fn stats(&self) -> ArenaStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        ArenaStats {
            index: self.index,
            capacity: state.top.capacity(),
            used: state.cursor,
            remaining: state.remaining,
            allocations: state.allocations,
            resizes: state.resizes,
        }
    }

    /// Give up the arena, returning its current buffer.
    pub fn into_buffer(self) -> Buffer {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .top
    }
}
