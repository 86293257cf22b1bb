//! C-compatible status codes.

use tessera_core::AllocError;

/// Status code returned by every FFI function.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TesseraStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// A pointer argument is null or a size is zero.
    InvalidArgument = -2,
    /// A backing buffer could not be acquired.
    OutOfMemory = -3,
    /// The operation is illegal in the allocator's lifecycle state.
    InvalidState = -4,
    /// `tessera_init` was given an invalid configuration.
    ConfigError = -5,
    /// Internal error (e.g. a lock poisoned by an earlier panic).
    InternalError = -6,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&AllocError> for TesseraStatus {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::OutOfMemory { .. } => TesseraStatus::OutOfMemory,
            AllocError::InvalidState { .. } => TesseraStatus::InvalidState,
            AllocError::ZeroSize => TesseraStatus::InvalidArgument,
            AllocError::ArenaPoisoned { .. } => TesseraStatus::InternalError,
            AllocError::Config(_) => TesseraStatus::ConfigError,
        }
    }
}
