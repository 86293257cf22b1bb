//! The allocator handle and its lifecycle.
//!
//! [`Allocator`] moves through `Uninitialized → Ready → Destroyed` and may
//! be re-initialised after `destroy`. `init` and `destroy` take `&mut self`
//! while `allocate` takes `&self` and returns a [`Block`] borrowing the
//! allocator, so the borrow checker guarantees that no allocation is in
//! flight and no block is still held when the arenas are torn down.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tessera_arena::{ArenaList, Block, MemoryLedger, RetiredList};
use tessera_core::error::Operation;
use tessera_core::{AllocError, ArenaIndex, ArenaRouter, ConfigError, LifecycleState};
use tracing::debug;

use crate::config::AllocatorConfig;
use crate::router;
use crate::stats::{AllocatorStats, TeardownReport};

/// Everything that exists only while `Ready`.
struct Heap {
    arenas: ArenaList,
    retired: RetiredList,
    router: Box<dyn ArenaRouter>,
    config: AllocatorConfig,
}

impl Heap {
    fn teardown(self) -> TeardownReport {
        let Heap {
            arenas,
            mut retired,
            ..
        } = self;
        let current = arenas.release();
        let (retired_buffers, retired_bytes) = retired.release_all();
        TeardownReport {
            arenas: current.arenas,
            current_buffers: current.buffers,
            retired_buffers,
            bytes_released: current.bytes + retired_bytes,
        }
    }
}

enum Lifecycle {
    Uninitialized,
    Ready(Heap),
    Destroyed,
}

impl Lifecycle {
    fn state(&self) -> LifecycleState {
        match self {
            Self::Uninitialized => LifecycleState::Uninitialized,
            Self::Ready(_) => LifecycleState::Ready,
            Self::Destroyed => LifecycleState::Destroyed,
        }
    }
}

/// A thread-aware arena allocator.
///
/// Create with [`Allocator::new`], then [`init`](Allocator::init) before
/// allocating. Share across threads by reference (for example with
/// `std::thread::scope`); each thread is routed to one arena and only ever
/// takes that arena's lock.
pub struct Allocator {
    lifecycle: Lifecycle,
    /// Ledger of the current (or most recent) `Ready` period.
    ledger: Arc<MemoryLedger>,
}

// Compile-time assertion: Allocator must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Allocator>();
};

impl Allocator {
    /// Create an uninitialised allocator. No memory is acquired.
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Build the arenas described by `config`, routing with the config's
    /// built-in policy.
    ///
    /// Legal from `Uninitialized` or `Destroyed`. On any error the
    /// allocator stays in the state it was in and holds no memory.
    pub fn init(&mut self, config: AllocatorConfig) -> Result<(), AllocError> {
        let router = router::for_policy(config.routing);
        self.init_with_router(config, router)
    }

    /// Like [`init`](Allocator::init) but with a caller-supplied router.
    ///
    /// `config.routing` is ignored and kept as given in
    /// [`config`](Allocator::config); use
    /// [`router_name`](Allocator::router_name) to see which router is live.
    pub fn init_with_router(
        &mut self,
        config: AllocatorConfig,
        router: Box<dyn ArenaRouter>,
    ) -> Result<(), AllocError> {
        let state = self.state();
        if !state.can_init() {
            return Err(AllocError::InvalidState {
                operation: Operation::Init,
                state,
            });
        }
        config.validate()?;
        let count = NonZeroUsize::new(config.num_arenas).ok_or(ConfigError::ZeroArenaCount)?;

        let ledger = Arc::new(match config.memory_limit {
            Some(limit) => MemoryLedger::with_limit(limit),
            None => MemoryLedger::new(),
        });
        let arenas = ArenaList::new(config.default_arena_size, count, &ledger)?;

        debug!(
            arena_size = config.default_arena_size,
            num_arenas = config.num_arenas,
            router = router.name(),
            memory_limit = ?config.memory_limit,
            "allocator initialised"
        );
        self.ledger = ledger;
        self.lifecycle = Lifecycle::Ready(Heap {
            arenas,
            retired: RetiredList::new(),
            router,
            config,
        });
        Ok(())
    }

    fn heap(&self, operation: Operation) -> Result<&Heap, AllocError> {
        match &self.lifecycle {
            Lifecycle::Ready(heap) => Ok(heap),
            other => Err(AllocError::InvalidState {
                operation,
                state: other.state(),
            }),
        }
    }

    /// Allocate `size` uninitialised bytes from the calling thread's arena.
    ///
    /// Blocks only on that one arena's lock. If the arena lacks space it
    /// grows to a fresh buffer of twice `size`, retiring the old buffer;
    /// earlier blocks stay valid.
    ///
    /// # Errors
    ///
    /// - [`AllocError::InvalidState`] unless `Ready`.
    /// - [`AllocError::ZeroSize`] for `size == 0`.
    /// - [`AllocError::OutOfMemory`] if a replacement buffer cannot be
    ///   acquired; the arena is unchanged and later calls may succeed.
    /// - [`AllocError::ArenaPoisoned`] if the arena's lock was poisoned.
    pub fn allocate(&self, size: usize) -> Result<Block<'_>, AllocError> {
        let heap = self.heap(Operation::Allocate)?;
        if size == 0 {
            return Err(AllocError::ZeroSize);
        }
        let index = heap.router.route(heap.arenas.len());
        heap.arenas
            .arena_for(index)
            .allocate(size, &heap.retired, &self.ledger)
    }

    /// The arena the calling thread is routed to, if `Ready`.
    pub fn current_arena(&self) -> Option<ArenaIndex> {
        let heap = self.heap(Operation::Allocate).ok()?;
        let index = heap.router.route(heap.arenas.len());
        Some(heap.arenas.arena_for(index).index())
    }

    /// Release every current and retired buffer and the arena list.
    ///
    /// Legal only from `Ready`; a second call without an intervening
    /// `init` returns [`AllocError::InvalidState`] and changes nothing.
    pub fn destroy(&mut self) -> Result<TeardownReport, AllocError> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Destroyed) {
            Lifecycle::Ready(heap) => {
                let report = heap.teardown();
                debug!(
                    arenas = report.arenas,
                    buffers = report.buffers_released(),
                    bytes = report.bytes_released,
                    "allocator destroyed"
                );
                Ok(report)
            }
            other => {
                let state = other.state();
                self.lifecycle = other;
                Err(AllocError::InvalidState {
                    operation: Operation::Destroy,
                    state,
                })
            }
        }
    }

    /// Per-arena and retired-list statistics, if `Ready`.
    pub fn stats(&self) -> Option<AllocatorStats> {
        let heap = self.heap(Operation::Allocate).ok()?;
        Some(AllocatorStats {
            arenas: heap.arenas.stats(),
            retired_buffers: heap.retired.len(),
            retired_bytes: heap.retired.bytes(),
            ledger: self.ledger.snapshot(),
        })
    }

    /// The active configuration, if `Ready`.
    pub fn config(&self) -> Option<&AllocatorConfig> {
        self.heap(Operation::Allocate).ok().map(|h| &h.config)
    }

    /// Name of the router mapping threads onto arenas, if `Ready`.
    pub fn router_name(&self) -> Option<&str> {
        self.heap(Operation::Allocate).ok().map(|h| h.router.name())
    }

    /// Arena count, if `Ready`.
    pub fn num_arenas(&self) -> Option<NonZeroUsize> {
        self.heap(Operation::Allocate).ok().map(|h| h.arenas.len())
    }

    /// Ledger of the current `Ready` period, or of the most recent one
    /// after `destroy`. Use it to check that teardown released everything.
    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}
