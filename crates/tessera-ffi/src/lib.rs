//! C ABI for the Tessera allocator.
//!
//! Mirrors the classic `init` / `malloc` / `destroy` surface over
//! explicit handles. Every entry point returns a [`TesseraStatus`] code
//! and catches panics at the boundary. This crate is one of two that may
//! contain `unsafe` code (along with `tessera-arena`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into [`TesseraStatus::Panicked`].
///
/// `return` inside the body returns from the guarded closure.
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(_) => $crate::status::TesseraStatus::Panicked as i32,
        }
    };
}

/// Lock a mutex, returning [`TesseraStatus::InternalError`] if poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::TesseraStatus::InternalError as i32,
        }
    };
}

pub mod allocator;
mod handle;
pub mod status;

pub use allocator::{tessera_allocate, tessera_destroy, tessera_init};
pub use status::TesseraStatus;
