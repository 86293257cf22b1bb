//! Independently-locked bump arenas for the Tessera allocator.
//!
//! Provides the storage layer underneath `tessera-engine`'s `Allocator`.
//! This crate is one of two that may contain `unsafe` code (along with
//! `tessera-ffi`), and all of it lives in `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! ArenaList (fixed at init)
//! ├── Arena × N
//! │   └── Mutex<ArenaState> { top: Buffer, cursor, remaining }
//! RetiredList (lock-free MPMC queue, shared by every arena)
//! └── Retired { arena, buffer } × one per resize
//! MemoryLedger (Arc, shared by every Buffer)
//! ```
//!
//! # Growth policy
//!
//! When a request does not fit in an arena's remaining space, the arena
//! acquires a fresh buffer of `GROWTH_FACTOR * size` bytes (sized from the
//! request, not from the arena's previous capacity), retires the old
//! buffer into the [`RetiredList`], and bump-allocates from the new one.
//! Retired buffers stay alive until teardown, so every region handed out
//! remains valid for the allocator's lifetime.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod block;
pub mod buffer;
pub mod ledger;
pub mod list;
mod raw;
pub mod retired;

// Public re-exports for the primary API surface.
pub use arena::{Arena, ArenaStats, GROWTH_FACTOR};
pub use block::Block;
pub use buffer::Buffer;
pub use ledger::{LedgerSnapshot, MemoryLedger};
pub use list::{ArenaList, ReleaseSummary};
pub use retired::{Retired, RetiredList};
