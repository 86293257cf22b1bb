//! Backing buffers.
//!
//! A [`Buffer`] is one contiguous heap block underlying an arena. It is
//! acquired against a [`MemoryLedger`] and reports its own release to that
//! ledger when dropped, so a buffer can never be released twice or leak
//! out of the accounting.

use std::fmt;
use std::sync::Arc;

use tessera_core::AllocError;

use crate::ledger::MemoryLedger;
use crate::raw::{RawBuffer, RawRegion};

/// An owned backing buffer.
pub struct Buffer {
    raw: RawBuffer,
    ledger: Arc<MemoryLedger>,
}

impl Buffer {
    /// Acquire a `capacity`-byte buffer, charging it to `ledger`.
    ///
    /// Returns [`AllocError::OutOfMemory`] if the ledger's limit would be
    /// exceeded or the system allocator cannot satisfy the request. On
    /// failure the ledger is left exactly as it was.
    pub fn acquire(capacity: usize, ledger: &Arc<MemoryLedger>) -> Result<Self, AllocError> {
        if capacity == 0 || !ledger.reserve(capacity) {
            return Err(AllocError::OutOfMemory {
                requested: capacity,
            });
        }
        match RawBuffer::allocate(capacity) {
            Some(raw) => {
                ledger.commit_acquire(capacity);
                Ok(Self {
                    raw,
                    ledger: Arc::clone(ledger),
                })
            }
            None => {
                ledger.cancel_reservation(capacity);
                Err(AllocError::OutOfMemory {
                    requested: capacity,
                })
            }
        }
    }

    /// Size of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Base address of the buffer.
    pub fn addr(&self) -> usize {
        self.raw.addr()
    }

    pub(crate) fn region(&self, offset: usize, len: usize) -> RawRegion {
        self.raw.region(offset, len)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.ledger.record_release(self.raw.capacity());
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("capacity", &self.capacity())
            .finish()
    }
}
