//! Core types and traits for the Tessera arena allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: the arena index,
//! the allocator lifecycle states, the error taxonomy, and the
//! [`ArenaRouter`] trait that maps threads onto arenas.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod state;
pub mod traits;

pub use error::{AllocError, ConfigError, Operation};
pub use id::ArenaIndex;
pub use state::LifecycleState;
pub use traits::ArenaRouter;
