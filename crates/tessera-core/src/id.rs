//! Strongly-typed identifiers.

use std::fmt;

/// Position of an arena within its allocator's arena list.
///
/// Arenas are built once at `init` and numbered `0..num_arenas` in
/// construction order. The index is stable for the lifetime of the
/// allocator instance that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaIndex(pub usize);

impl ArenaIndex {
    /// The raw positional value.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ArenaIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ArenaIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}
