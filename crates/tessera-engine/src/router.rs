//! Built-in [`ArenaRouter`] implementations.
//!
//! Both routers are stable per thread: a thread keeps its arena for the
//! lifetime of the router. [`RoundRobinRouter`] assigns arenas in turn on a
//! thread's first allocation and keeps the assignment in per-thread state
//! it owns; [`ThreadHashRouter`] derives the arena from a hash of the
//! thread's ID.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use tessera_core::{ArenaIndex, ArenaRouter};
use thread_local::ThreadLocal;

use crate::config::RoutingPolicy;

/// Build the router for a built-in policy.
pub(crate) fn for_policy(policy: RoutingPolicy) -> Box<dyn ArenaRouter> {
    match policy {
        RoutingPolicy::RoundRobin => Box::new(RoundRobinRouter::new()),
        RoutingPolicy::ThreadHash => Box::new(ThreadHashRouter),
    }
}

// ── RoundRobinRouter ───────────────────────────────────────────────

/// Hands each new thread the next arena in turn.
///
/// The first `route` call on a thread draws a ticket from a shared counter
/// and stores it in a [`ThreadLocal`] slot owned by the router; later calls
/// reuse it. With `T` threads and `K` arenas, the first `K` threads land on
/// distinct arenas and per-arena load never differs by more than one
/// thread. Tickets are freed with the router, so a thread that cycles
/// through many allocators holds nothing for the ones already dropped.
///
/// The slot is keyed by the `thread_local` crate's thread ID, which is
/// recycled once a thread exits: a new thread may pick up the ticket of
/// one that has already finished. A thread that allocates from its own
/// thread-local destructors, after that ID has been given back, draws a
/// fresh ticket and may move to another arena for those last calls.
pub struct RoundRobinRouter {
    tickets: ThreadLocal<usize>,
    next: AtomicUsize,
}

impl RoundRobinRouter {
    /// Create a router with no tickets issued.
    pub fn new() -> Self {
        Self {
            tickets: ThreadLocal::new(),
            next: AtomicUsize::new(0),
        }
    }

    /// Number of tickets drawn so far.
    ///
    /// Threads that inherit a recycled slot do not draw a new one.
    pub fn threads_seen(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }

    fn ticket(&self) -> usize {
        *self
            .tickets
            .get_or(|| self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RoundRobinRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaRouter for RoundRobinRouter {
    fn route(&self, arena_count: NonZeroUsize) -> ArenaIndex {
        ArenaIndex(self.ticket() % arena_count.get())
    }

    fn name(&self) -> &str {
        "round-robin"
    }
}

// ── ThreadHashRouter ───────────────────────────────────────────────

/// Routes by a hash of the calling thread's `ThreadId`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadHashRouter;

impl ArenaRouter for ThreadHashRouter {
    fn route(&self, arena_count: NonZeroUsize) -> ArenaIndex {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        ArenaIndex((hasher.finish() % arena_count.get() as u64) as usize)
    }

    fn name(&self) -> &str {
        "thread-hash"
    }
}
