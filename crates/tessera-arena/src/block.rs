//! Regions handed out by `allocate`.

use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ops::Range;

use tessera_core::ArenaIndex;

use crate::raw::RawRegion;

/// A bump-allocated byte region, valid for as long as its allocator is
/// borrowed.
///
/// The lifetime `'a` ties the block to the shared borrows of the arena and
/// the retired list that produced it. A resize moves the block's buffer
/// onto that list, and releasing either needs an exclusive borrow, so no
/// block can outlive the buffer it points into.
///
/// The bytes are never zeroed: they start uninitialised and may hold
/// leftovers from a previous occupant. Initialise them with
/// [`fill`](Block::fill) or [`copy_from`](Block::copy_from), or write
/// through [`as_uninit_mut`](Block::as_uninit_mut).
#[must_use]
pub struct Block<'a> {
    region: RawRegion,
    arena: ArenaIndex,
    _allocator: PhantomData<&'a ()>,
}

impl<'a> Block<'a> {
    pub(crate) fn new(region: RawRegion, arena: ArenaIndex) -> Self {
        Self {
            region,
            arena,
            _allocator: PhantomData,
        }
    }

    /// Length of the block in bytes. Always equal to the requested size.
    pub fn len(&self) -> usize {
        self.region.len()
    }

    /// Always `false`: zero-sized requests are rejected.
    pub fn is_empty(&self) -> bool {
        self.region.len() == 0
    }

    /// The arena this block was carved from.
    pub fn arena(&self) -> ArenaIndex {
        self.arena
    }

    /// Raw pointer to the first byte.
    pub fn as_ptr(&self) -> *const u8 {
        self.region.as_ptr()
    }

    /// Mutable raw pointer to the first byte.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.region.as_mut_ptr()
    }

    /// Address range covered by the block.
    pub fn addr_range(&self) -> Range<usize> {
        let start = self.region.as_ptr() as usize;
        start..start + self.region.len()
    }

    /// The block's bytes, possibly uninitialised.
    pub fn as_uninit_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        self.region.as_uninit_mut()
    }

    /// Set every byte to `byte` and return the initialised contents.
    pub fn fill(&mut self, byte: u8) -> &mut [u8] {
        self.region.fill(byte)
    }

    /// Copy `src` into the front of the block and return that prefix.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() > self.len()`.
    pub fn copy_from(&mut self, src: &[u8]) -> &mut [u8] {
        self.region.copy_from(src)
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("arena", &self.arena)
            .field("addr", &format_args!("{:#x}", self.as_ptr() as usize))
            .field("len", &self.len())
            .finish()
    }
}
