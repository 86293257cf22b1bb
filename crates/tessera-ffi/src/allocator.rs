//! Allocator lifecycle FFI: init, allocate, destroy.
//!
//! Each allocator lives in an `Arc<RwLock<Allocator>>` so the global
//! table lock is only held for handle lookup. Allocation takes the read
//! lock, letting threads allocate concurrently through the allocator's own
//! per-arena locking; destroy takes the write lock and therefore waits for
//! every in-flight allocation on that handle to finish.

use std::sync::{Arc, Mutex, RwLock};

use tessera_engine::{Allocator, AllocatorConfig};

use crate::handle::HandleTable;
use crate::status::TesseraStatus;

type AllocatorArc = Arc<RwLock<Allocator>>;

static ALLOCATORS: Mutex<HandleTable<AllocatorArc>> = Mutex::new(HandleTable::new());

/// Clone the Arc for a handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
fn get_allocator(handle: u64) -> Option<AllocatorArc> {
    ALLOCATORS.lock().ok()?.get(handle).cloned()
}

/// Create an allocator with `num_arenas` arenas of `default_size` bytes.
///
/// On success, writes the new handle to `handle_out` and returns 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tessera_init(default_size: usize, num_arenas: usize, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return TesseraStatus::InvalidArgument as i32;
        }
        let mut allocator = Allocator::new();
        if let Err(e) = allocator.init(AllocatorConfig::new(default_size, num_arenas)) {
            return TesseraStatus::from(&e) as i32;
        }

        let handle = ffi_lock!(ALLOCATORS).insert(Arc::new(RwLock::new(allocator)));
        // SAFETY: handle_out is non-null and valid per caller contract.
        unsafe { *handle_out = handle };
        TesseraStatus::Ok as i32
    })
}

/// Allocate `size` bytes from the calling thread's arena.
///
/// On success, writes the block's address to `ptr_out`. The block is
/// uninitialised and stays valid until `tessera_destroy(handle)`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tessera_allocate(handle: u64, size: usize, ptr_out: *mut *mut u8) -> i32 {
    ffi_guard!({
        if ptr_out.is_null() || size == 0 {
            return TesseraStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_allocator(handle) else {
            return TesseraStatus::InvalidHandle as i32;
        };
        let allocator = match arc.read() {
            Ok(guard) => guard,
            Err(_) => return TesseraStatus::InternalError as i32,
        };
        let ptr = match allocator.allocate(size) {
            Ok(mut block) => block.as_mut_ptr(),
            Err(e) => return TesseraStatus::from(&e) as i32,
        };
        // SAFETY: ptr_out is non-null and valid per caller contract.
        unsafe { *ptr_out = ptr };
        TesseraStatus::Ok as i32
    })
}

/// Destroy an allocator, releasing every buffer it acquired.
///
/// Blocks until in-flight `tessera_allocate` calls on the handle return.
/// The handle is stale afterwards; a second destroy returns
/// `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tessera_destroy(handle: u64) -> i32 {
    ffi_guard!({
        let Some(arc) = ffi_lock!(ALLOCATORS).remove(handle) else {
            return TesseraStatus::InvalidHandle as i32;
        };
        let mut allocator = match arc.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match allocator.destroy() {
            Ok(_) => TesseraStatus::Ok as i32,
            Err(e) => TesseraStatus::from(&e) as i32,
        }
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::ptr;

    fn init(size: usize, arenas: usize) -> u64 {
        let mut h = 0u64;
        assert_eq!(tessera_init(size, arenas, &mut h), TesseraStatus::Ok as i32);
        h
    }

    fn allocate(h: u64, size: usize) -> Result<*mut u8, i32> {
        let mut p = ptr::null_mut();
        match tessera_allocate(h, size, &mut p) {
            0 => Ok(p),
            status => Err(status),
        }
    }

    #[test]
    fn init_allocate_destroy() {
        let h = init(1024, 1);
        let p = allocate(h, 600).unwrap();
        assert!(!p.is_null());
        let q = allocate(h, 600).unwrap();
        assert_ne!(p, q);

        // SAFETY: both blocks are 600 bytes and live until destroy.
        unsafe {
            ptr::write_bytes(p, 0xAB, 600);
            ptr::write_bytes(q, 0xCD, 600);
            assert_eq!(*p.add(599), 0xAB);
            assert_eq!(*q, 0xCD);
        }

        assert_eq!(tessera_destroy(h), TesseraStatus::Ok as i32);
    }

    #[test]
    fn destroyed_handle_is_stale() {
        let h = init(64, 2);
        assert_eq!(tessera_destroy(h), TesseraStatus::Ok as i32);
        assert_eq!(tessera_destroy(h), TesseraStatus::InvalidHandle as i32);
        assert_eq!(allocate(h, 8), Err(TesseraStatus::InvalidHandle as i32));
    }

    #[test]
    fn null_out_pointers_rejected() {
        assert_eq!(
            tessera_init(64, 1, ptr::null_mut()),
            TesseraStatus::InvalidArgument as i32
        );
        let h = init(64, 1);
        assert_eq!(
            tessera_allocate(h, 8, ptr::null_mut()),
            TesseraStatus::InvalidArgument as i32
        );
        assert_eq!(allocate(h, 0), Err(TesseraStatus::InvalidArgument as i32));
        assert_eq!(tessera_destroy(h), TesseraStatus::Ok as i32);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut h = 0u64;
        assert_eq!(
            tessera_init(0, 4, &mut h),
            TesseraStatus::ConfigError as i32
        );
        assert_eq!(
            tessera_init(1024, 0, &mut h),
            TesseraStatus::ConfigError as i32
        );
        assert_eq!(h, 0);
    }

    #[test]
    fn unknown_handle_rejected() {
        assert_eq!(
            allocate(u64::MAX, 8),
            Err(TesseraStatus::InvalidHandle as i32)
        );
        assert_eq!(
            tessera_destroy(u64::MAX),
            TesseraStatus::InvalidHandle as i32
        );
    }

    #[test]
    fn initial_buffer_too_large_is_out_of_memory() {
        let mut h = 0u64;
        assert_eq!(
            tessera_init(usize::MAX / 2, 1, &mut h),
            TesseraStatus::OutOfMemory as i32
        );
    }

    #[test]
    fn concurrent_allocation_through_one_handle() {
        let h = init(1024, 4);
        std::thread::scope(|s| {
            for t in 0..8u8 {
                s.spawn(move || {
                    for _ in 0..1000 {
                        let p = allocate(h, 16).unwrap();
                        // SAFETY: 16-byte block owned by this thread.
                        unsafe {
                            ptr::write_bytes(p, t, 16);
                            assert!(std::slice::from_raw_parts(p, 16).iter().all(|&b| b == t));
                        }
                    }
                });
            }
        });
        assert_eq!(tessera_destroy(h), TesseraStatus::Ok as i32);
    }
}
