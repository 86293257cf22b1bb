//! Tessera: a thread-aware arena allocator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Tessera sub-crates. For most users, adding `tessera` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let mut alloc = Allocator::new();
//! alloc.init(AllocatorConfig::new(1024, 4)).unwrap();
//!
//! std::thread::scope(|s| {
//!     for t in 0..4u8 {
//!         let alloc = &alloc;
//!         s.spawn(move || {
//!             let mut block = alloc.allocate(16).unwrap();
//!             assert!(block.fill(t).iter().all(|&b| b == t));
//!         });
//!     }
//! });
//!
//! let report = alloc.destroy().unwrap();
//! assert_eq!(report.arenas, 4);
//! assert!(alloc.ledger().snapshot().is_balanced());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | IDs, errors, lifecycle state, the `ArenaRouter` trait |
//! | [`arena`] | `tessera-arena` | Arenas, blocks, backing buffers, retired list, memory ledger |
//! | [`engine`] | `tessera-engine` | `Allocator`, configuration, routers, statistics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors and traits (`tessera-core`).
///
/// Implement [`types::ArenaRouter`] to plug in a custom thread-to-arena
/// mapping.
pub use tessera_core as types;

/// Arena storage (`tessera-arena`).
///
/// Most users only need [`arena::Block`], which is also in the [`prelude`].
pub use tessera_arena as arena;

/// The allocator and its configuration (`tessera-engine`).
pub use tessera_engine as engine;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use tessera_arena::{Block, LedgerSnapshot};

    // Core types and traits
    pub use tessera_core::{AllocError, ArenaIndex, ArenaRouter, ConfigError, LifecycleState};

    // Engine
    pub use tessera_engine::{
        Allocator, AllocatorConfig, AllocatorStats, RoundRobinRouter, RoutingPolicy,
        TeardownReport, ThreadHashRouter,
    };
}
