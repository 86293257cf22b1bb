//! Allocator configuration and validation.

use std::fmt;

use tessera_core::ConfigError;

// ── RoutingPolicy ──────────────────────────────────────────────────

/// Built-in thread-to-arena routing strategies.
///
/// Custom strategies can be installed with
/// [`Allocator::init_with_router`](crate::Allocator::init_with_router).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// Each thread takes the next arena in turn on its first allocation
    /// and keeps it. Spreads threads evenly regardless of how thread IDs
    /// are represented.
    #[default]
    RoundRobin,
    /// Hash of the thread's `ThreadId`, modulo the arena count. Stateless,
    /// but the spread depends on the hash.
    ThreadHash,
}

impl fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin => write!(f, "round-robin"),
            Self::ThreadHash => write!(f, "thread-hash"),
        }
    }
}

// ── AllocatorConfig ────────────────────────────────────────────────

/// Configuration consumed by [`Allocator::init`](crate::Allocator::init).
///
/// Validated at `init`; immutable for the allocator's `Ready` lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Size in bytes of each arena's initial backing buffer. Must be > 0.
    pub default_arena_size: usize,
    /// Number of arenas. Fixed until `destroy`. Must be > 0.
    pub num_arenas: usize,
    /// How threads are mapped onto arenas.
    ///
    /// Read by [`Allocator::init`](crate::Allocator::init) only; a router
    /// passed to [`Allocator::init_with_router`](crate::Allocator::init_with_router)
    /// replaces it, and [`Allocator::router_name`](crate::Allocator::router_name)
    /// reports the router actually in use.
    pub routing: RoutingPolicy,
    /// Optional cap on live backing bytes across all arenas, including
    /// retired buffers. Acquisitions beyond it fail with `OutOfMemory`.
    pub memory_limit: Option<usize>,
}

impl AllocatorConfig {
    /// Default initial arena size: 1 KiB.
    pub const DEFAULT_ARENA_SIZE: usize = 1024;

    /// Default arena count.
    pub const DEFAULT_NUM_ARENAS: usize = 4;

    /// Create a config with the given sizing and default routing.
    pub fn new(default_arena_size: usize, num_arenas: usize) -> Self {
        Self {
            default_arena_size,
            num_arenas,
            routing: RoutingPolicy::default(),
            memory_limit: None,
        }
    }

    /// Replace the routing policy.
    pub fn with_routing(mut self, routing: RoutingPolicy) -> Self {
        self.routing = routing;
        self
    }

    /// Cap live backing bytes.
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = Some(limit);
        self
    }

    /// Bytes needed for the initial arena buffers.
    pub fn initial_footprint(&self) -> Option<usize> {
        self.default_arena_size.checked_mul(self.num_arenas)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_arena_size == 0 {
            return Err(ConfigError::ZeroArenaSize);
        }
        if self.num_arenas == 0 {
            return Err(ConfigError::ZeroArenaCount);
        }
        let required = self
            .initial_footprint()
            .ok_or(ConfigError::FootprintOverflow {
                arena_size: self.default_arena_size,
                num_arenas: self.num_arenas,
            })?;
        if let Some(limit) = self.memory_limit {
            if limit < required {
                return Err(ConfigError::MemoryLimitTooSmall { limit, required });
            }
        }
        Ok(())
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ARENA_SIZE, Self::DEFAULT_NUM_ARENAS)
    }
}
