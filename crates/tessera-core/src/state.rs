//! Allocator lifecycle states.

use std::fmt;

/// Where an allocator is in its `init` / `destroy` lifecycle.
///
/// ```text
/// Uninitialized --init--> Ready --destroy--> Destroyed --init--> Ready ...
/// ```
///
/// `allocate` is only valid in [`LifecycleState::Ready`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed but never initialised.
    Uninitialized,
    /// Arenas are built and accepting allocations.
    Ready,
    /// Torn down; every backing buffer has been released.
    Destroyed,
}

impl LifecycleState {
    /// Whether `init` is a legal transition from this state.
    pub fn can_init(self) -> bool {
        !matches!(self, Self::Ready)
    }

    /// Whether `allocate` and `destroy` are legal in this state.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready => write!(f, "ready"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}
