//! Thread-aware allocator built from independently-locked arenas.
//!
//! [`Allocator`] is an explicit handle that owns a fixed list of arenas, a
//! shared retired-buffer list and a routing strategy. Each `allocate` call
//! locks exactly one arena, chosen by the calling thread, so threads routed
//! to different arenas never contend.
//!
//! ```rust
//! use tessera_engine::{Allocator, AllocatorConfig};
//!
//! let mut alloc = Allocator::new();
//! alloc.init(AllocatorConfig::new(1024, 4)).unwrap();
//! {
//!     let mut block = alloc.allocate(64).unwrap();
//!     block.fill(0);
//! }
//! let report = alloc.destroy().unwrap();
//! assert_eq!(report.arenas, 4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod router;
pub mod stats;

pub use allocator::Allocator;
pub use config::{AllocatorConfig, RoutingPolicy};
pub use router::{RoundRobinRouter, ThreadHashRouter};
pub use stats::{AllocatorStats, TeardownReport};
