//! Error types for the Tessera allocator.
//!
//! [`AllocError`] is the single error type returned across the public
//! allocator surface. [`ConfigError`] covers configuration validation
//! and is wrapped by [`AllocError::Config`] when `init` rejects a config.

use std::error::Error;
use std::fmt;

use crate::id::ArenaIndex;
use crate::state::LifecycleState;

/// The allocator operation that was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `init`
    Init,
    /// `allocate`
    Allocate,
    /// `destroy`
    Destroy,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Allocate => write!(f, "allocate"),
            Self::Destroy => write!(f, "destroy"),
        }
    }
}

/// Errors from allocator operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// A backing buffer could not be acquired.
    ///
    /// Raised when the system allocator returns null, when the requested
    /// capacity overflows a valid layout, or when the configured memory
    /// limit would be exceeded. The arena that was resizing is left
    /// unchanged.
    OutOfMemory {
        /// Capacity in bytes of the buffer that could not be acquired.
        requested: usize,
    },
    /// The operation is not legal in the allocator's current state.
    InvalidState {
        /// What was attempted.
        operation: Operation,
        /// The state the allocator was in.
        state: LifecycleState,
    },
    /// `allocate(0)`: requests must be for at least one byte.
    ZeroSize,
    /// An arena's lock was poisoned by a panic on another thread.
    ///
    /// Only the named arena is affected; threads routed elsewhere
    /// continue normally.
    ArenaPoisoned {
        /// The arena whose lock is poisoned.
        arena: ArenaIndex,
    },
    /// `init` was given an invalid configuration.
    Config(ConfigError),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: could not acquire {requested} byte buffer")
            }
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while allocator is {state}")
            }
            Self::ZeroSize => write!(f, "allocation size must be at least one byte"),
            Self::ArenaPoisoned { arena } => write!(f, "arena {arena} lock is poisoned"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for AllocError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Errors detected while validating an allocator configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `default_arena_size` is zero.
    ZeroArenaSize,
    /// `num_arenas` is zero.
    ZeroArenaCount,
    /// `default_arena_size * num_arenas` does not fit in `usize`.
    FootprintOverflow {
        /// Configured per-arena size.
        arena_size: usize,
        /// Configured arena count.
        num_arenas: usize,
    },
    /// The memory limit cannot hold even the initial arena buffers.
    MemoryLimitTooSmall {
        /// Configured limit in bytes.
        limit: usize,
        /// Bytes needed for the initial buffers.
        required: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroArenaSize => write!(f, "default_arena_size must be at least 1"),
            Self::ZeroArenaCount => write!(f, "num_arenas must be at least 1"),
            Self::FootprintOverflow {
                arena_size,
                num_arenas,
            } => {
                write!(
                    f,
                    "initial footprint overflows: {num_arenas} arenas of {arena_size} bytes"
                )
            }
            Self::MemoryLimitTooSmall { limit, required } => {
                write!(
                    f,
                    "memory_limit {limit} is below the initial footprint of {required} bytes"
                )
            }
        }
    }
}

impl Error for ConfigError {}
