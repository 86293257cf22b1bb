//! Low-level primitives for arena memory operations.
//!
//! Every `unsafe` block in the workspace lives here. Two types are
//! provided: [`RawBuffer`], an owned heap allocation released on drop,
//! and [`RawRegion`], a sub-range of a `RawBuffer` handed out by a bump
//! allocation. Each `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::mem::MaybeUninit;
use std::ptr::NonNull;

/// Alignment requested for every backing buffer.
///
/// Matches what a system `malloc` returns on 64-bit targets. Regions carved
/// out of a buffer are only aligned if the preceding allocations happened
/// to keep them so; no further guarantee is made.
pub(crate) const BUFFER_ALIGN: usize = 16;

/// An owned, uninitialised heap allocation of `capacity` bytes.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    capacity: usize,
}

// SAFETY: RawBuffer exclusively owns its allocation; moving it to another
// thread moves that ownership. Shared references expose only the base
// address and capacity, never the bytes.
unsafe impl Send for RawBuffer {}
// SAFETY: see above; `&RawBuffer` offers no access to the memory itself.
unsafe impl Sync for RawBuffer {}

impl RawBuffer {
    /// Allocate `capacity` bytes from the global allocator.
    ///
    /// Returns `None` if `capacity` is zero, if the layout is invalid
    /// (capacity rounded up to `BUFFER_ALIGN` exceeds `isize::MAX`), or if
    /// the global allocator reports exhaustion.
    pub(crate) fn allocate(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let layout = Layout::from_size_align(capacity, BUFFER_ALIGN).ok()?;
        // SAFETY: `layout` has non-zero size, checked above.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).map(|ptr| Self { ptr, capacity })
    }

    /// Size of the allocation in bytes.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Base address, for diagnostics and overlap checks.
    pub(crate) fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Carve `[offset, offset + len)` out of this buffer.
    ///
    /// The caller (the owning arena's bump pointer) guarantees that each
    /// byte is handed out in at most one region.
    pub(crate) fn region(&self, offset: usize, len: usize) -> RawRegion {
        assert!(
            offset
                .checked_add(len)
                .is_some_and(|end| end <= self.capacity),
            "region [{offset}, +{len}) exceeds buffer capacity {}",
            self.capacity,
        );
        // SAFETY: `offset + len <= capacity` was asserted above, so the
        // resulting pointer stays inside (or one past the end of) the
        // allocation.
        let start = unsafe { self.ptr.as_ptr().add(offset) };
        RawRegion {
            // SAFETY: offsetting a non-null pointer within its allocation
            // cannot produce null.
            ptr: unsafe { NonNull::new_unchecked(start) },
            len,
        }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        // `allocate` validated this exact layout before handing out `self`.
        if let Ok(layout) = Layout::from_size_align(self.capacity, BUFFER_ALIGN) {
            // SAFETY: `ptr` was returned by `alloc` with this same layout
            // and is released exactly once, here.
            unsafe { dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}

/// A bump-allocated byte range inside a live [`RawBuffer`].
///
/// Regions never overlap while their buffer is live. The bytes start out
/// uninitialised and may contain whatever a previous occupant left behind.
pub(crate) struct RawRegion {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: a region is an exclusive view of bytes no other region covers;
// handing it to another thread is equivalent to moving a `&mut [u8]`.
unsafe impl Send for RawRegion {}
// SAFETY: shared access to a region only reads its address and length.
unsafe impl Sync for RawRegion {}

impl RawRegion {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// View the region as possibly-uninitialised bytes.
    pub(crate) fn as_uninit_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        // SAFETY: `ptr..ptr+len` lies inside a live allocation (the owning
        // Block borrows the allocator, which keeps every buffer alive), no
        // other region covers these bytes, and `MaybeUninit<u8>` has no
        // validity requirements.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.len) }
    }

    /// Set every byte to `byte` and return the now-initialised slice.
    pub(crate) fn fill(&mut self, byte: u8) -> &mut [u8] {
        let len = self.len;
        // SAFETY: same bounds argument as `as_uninit_mut`; `write_bytes`
        // initialises all `len` bytes before we reinterpret them as `u8`.
        unsafe {
            std::ptr::write_bytes(self.ptr.as_ptr(), byte, len);
            std::slice::from_raw_parts_mut(self.ptr.as_ptr(), len)
        }
    }

    /// Copy `src` into the start of the region and return that prefix.
    ///
    /// # Panics
    ///
    /// Panics if `src` is longer than the region.
    pub(crate) fn copy_from(&mut self, src: &[u8]) -> &mut [u8] {
        assert!(
            src.len() <= self.len,
            "source of {} bytes does not fit in a {} byte block",
            src.len(),
            self.len,
        );
        // SAFETY: `src.len() <= len` keeps the write inside the region;
        // `src` is a separate borrow so the ranges cannot overlap; the
        // copied prefix is initialised before it is reinterpreted.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr(), src.len());
            std::slice::from_raw_parts_mut(self.ptr.as_ptr(), src.len())
        }
    }
}
