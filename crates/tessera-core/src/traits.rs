//! Core abstraction traits.

use std::num::NonZeroUsize;

use crate::id::ArenaIndex;

/// Maps the calling thread onto one of an allocator's arenas.
///
/// The allocator calls [`route`](ArenaRouter::route) on every `allocate`,
/// from whichever thread is allocating. Implementations must be stable:
/// the same thread must receive the same index on every call for the
/// lifetime of the router, given the same `arena_count`. An index
/// `>= arena_count` is reduced modulo `arena_count` by the allocator.
///
/// Routers are installed at `init` and owned by the allocator, so a fresh
/// `init` after `destroy` starts from a fresh router.
pub trait ArenaRouter: Send + Sync {
    /// Pick the arena for the calling thread.
    fn route(&self, arena_count: NonZeroUsize) -> ArenaIndex;

    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;
}
