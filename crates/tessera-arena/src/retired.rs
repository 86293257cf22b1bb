//! Deferred release of buffers superseded by a resize.
//!
//! [`RetiredList`] is shared by every arena of one allocator. Arenas append
//! to it from inside their own critical sections, so appends from different
//! arenas run concurrently; the list is an unbounded `crossbeam-channel`
//! queue and needs no lock of its own. Entries are only ever removed at
//! teardown: [`RetiredList::drain`] and [`RetiredList::release_all`] take
//! `&mut self`, and every [`Block`](crate::Block) handed out by
//! [`Arena::allocate`](crate::Arena::allocate) borrows the list, so neither
//! can run while a block is alive.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender};
use tessera_core::ArenaIndex;

use crate::buffer::Buffer;

/// A buffer retired by a resize, tagged with the arena that retired it.
#[derive(Debug)]
pub struct Retired {
    arena: ArenaIndex,
    buffer: Buffer,
}

impl Retired {
    /// The arena that retired this buffer.
    pub fn arena(&self) -> ArenaIndex {
        self.arena
    }

    /// Capacity of the retired buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Base address of the retired buffer.
    pub fn addr(&self) -> usize {
        self.buffer.addr()
    }
}

/// Append-only record of retired buffers.
pub struct RetiredList {
    tx: Sender<Retired>,
    rx: Receiver<Retired>,
    /// Sum of capacities currently queued.
    bytes: AtomicUsize,
}

impl RetiredList {
    /// Create an empty list.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            tx,
            rx,
            bytes: AtomicUsize::new(0),
        }
    }

    /// Record `buffer` as retired by `arena`.
    pub fn append(&self, arena: ArenaIndex, buffer: Buffer) {
        self.bytes.fetch_add(buffer.capacity(), Ordering::Relaxed);
        // `rx` lives as long as `self`, so the channel is never disconnected
        // and the send cannot fail.
        let _ = self.tx.send(Retired { arena, buffer });
    }

    /// Number of retired buffers held.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no buffer has been retired.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Total capacity of retired buffers held, in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Take every retired buffer out of the list, in append order per arena.
    pub fn drain(&mut self) -> Vec<Retired> {
        let drained: Vec<Retired> = self.rx.try_iter().collect();
        let bytes: usize = drained.iter().map(Retired::capacity).sum();
        *self.bytes.get_mut() -= bytes;
        drained
    }

    /// Release every retired buffer, returning `(buffers, bytes)` released.
    ///
    /// Blocks borrow the list they were allocated against, so this cannot
    /// be called while one is still alive:
    ///
    /// ```compile_fail
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// use tessera_arena::{ArenaList, MemoryLedger, RetiredList};
    /// use tessera_core::ArenaIndex;
    ///
    /// let ledger = Arc::new(MemoryLedger::new());
    /// let mut retired = RetiredList::new();
    /// let list = ArenaList::new(64, NonZeroUsize::MIN, &ledger).unwrap();
    /// let arena = list.get(ArenaIndex(0)).unwrap();
    /// let block = arena.allocate(64, &retired, &ledger).unwrap();
    /// retired.release_all();
    /// drop(block);
    /// ```
    pub fn release_all(&mut self) -> (usize, usize) {
        let drained = self.drain();
        let count = drained.len();
        let bytes = drained.iter().map(Retired::capacity).sum();
        drop(drained);
        (count, bytes)
    }
}

impl Default for RetiredList {
    fn default() -> Self {
        Self::new()
    }
}
