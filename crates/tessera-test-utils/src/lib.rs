//! Workload drivers and pattern checks for Tessera development.
//!
//! Reproduces the classic allocator driver workloads: small integer arrays
//! written and read back in a tight loop ([`simple_cycles`]), a mixed
//! load of integer arrays and strings ([`load_mixed`]), and a scoped
//! multi-thread runner that collects failures instead of aborting
//! ([`run_threads`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt;

use crossbeam_channel::unbounded;
use tessera_arena::Block;
use tessera_core::AllocError;
use tessera_engine::Allocator;

/// Bytes per pattern word.
pub const WORD: usize = std::mem::size_of::<i32>();

/// The string written by the string half of [`load_mixed`].
pub const TEST_STRING: &str = "first test string";

/// Arrays in one even round of [`load_mixed`] have lengths `1..ARRAY_LENGTHS`.
pub const ARRAY_LENGTHS: usize = 100;

// ── Failure ────────────────────────────────────────────────────────

/// Why a workload stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// `allocate` returned an error.
    Alloc {
        context: &'static str,
        iteration: usize,
        size: usize,
        error: AllocError,
    },
    /// A word read back differed from the one written.
    Corrupt {
        context: &'static str,
        iteration: usize,
        index: usize,
        expected: i32,
        found: i32,
    },
    /// A string read back differed from the one written.
    StringMismatch { iteration: usize, found: String },
    /// The worker thread panicked.
    Panicked { worker: usize },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc {
                context,
                iteration,
                size,
                error,
            } => write!(
                f,
                "{context}: allocation of {size} bytes failed at iteration {iteration}: {error}"
            ),
            Self::Corrupt {
                context,
                iteration,
                index,
                expected,
                found,
            } => write!(
                f,
                "{context}: iteration {iteration} index {index} expected {expected}, found {found}"
            ),
            Self::StringMismatch { iteration, found } => write!(
                f,
                "string allocation iteration {iteration} read back {found:?}, expected {TEST_STRING:?}"
            ),
            Self::Panicked { worker } => write!(f, "worker {worker} panicked"),
        }
    }
}

impl std::error::Error for Failure {}

// ── Patterns ───────────────────────────────────────────────────────

/// Write the words `0, 1, .., count - 1` into the front of `block` and
/// return the initialised bytes.
///
/// # Panics
///
/// Panics if the block is shorter than `count * WORD` bytes.
pub fn write_pattern<'b>(block: &'b mut Block<'_>, count: usize) -> &'b mut [u8] {
    let bytes = &mut block.fill(0)[..count * WORD];
    for (k, word) in bytes.chunks_exact_mut(WORD).enumerate() {
        word.copy_from_slice(&(k as i32).to_ne_bytes());
    }
    bytes
}

/// Check that `bytes` holds the words `0, 1, ..`.
///
/// Returns the first mismatch as `(index, expected, found)`.
pub fn verify_pattern(bytes: &[u8]) -> Result<(), (usize, i32, i32)> {
    for (k, word) in bytes.chunks_exact(WORD).enumerate() {
        let mut raw = [0u8; WORD];
        raw.copy_from_slice(word);
        let found = i32::from_ne_bytes(raw);
        if found != k as i32 {
            return Err((k, k as i32, found));
        }
    }
    Ok(())
}

fn checked_array(
    alloc: &Allocator,
    context: &'static str,
    iteration: usize,
    count: usize,
) -> Result<(), Failure> {
    let size = count * WORD;
    let mut block = alloc.allocate(size).map_err(|error| Failure::Alloc {
        context,
        iteration,
        size,
        error,
    })?;
    let bytes = write_pattern(&mut block, count);
    verify_pattern(bytes).map_err(|(index, expected, found)| Failure::Corrupt {
        context,
        iteration,
        index,
        expected,
        found,
    })
}

// ── Workloads ──────────────────────────────────────────────────────

/// `cycles` rounds of: allocate four words, write them, read them back.
pub fn simple_cycles(alloc: &Allocator, cycles: usize) -> Result<(), Failure> {
    for iteration in 0..cycles {
        checked_array(alloc, "simple", iteration, 4)?;
    }
    Ok(())
}

/// `rounds` rounds of mixed load.
///
/// Even rounds allocate integer arrays of every length in
/// `1..ARRAY_LENGTHS` and verify them; odd rounds allocate that many
/// NUL-terminated copies of [`TEST_STRING`] and compare them.
pub fn load_mixed(alloc: &Allocator, rounds: usize) -> Result<(), Failure> {
    let mut expected = TEST_STRING.as_bytes().to_vec();
    expected.push(0);

    for iteration in 0..rounds {
        if iteration % 2 == 0 {
            for len in 1..ARRAY_LENGTHS {
                checked_array(alloc, "array", iteration, len)?;
            }
        } else {
            for _ in 1..ARRAY_LENGTHS {
                let size = expected.len();
                let mut block = alloc.allocate(size).map_err(|error| Failure::Alloc {
                    context: "string",
                    iteration,
                    size,
                    error,
                })?;
                let copied = block.copy_from(&expected);
                if &*copied != expected.as_slice() {
                    return Err(Failure::StringMismatch {
                        iteration,
                        found: String::from_utf8_lossy(copied).into_owned(),
                    });
                }
            }
        }
    }
    Ok(())
}

// ── Threads ────────────────────────────────────────────────────────

/// Run `f(worker, alloc)` on `threads` scoped threads sharing `alloc`.
///
/// Every failure is collected, including panics, and returned sorted by
/// worker index. An empty result means every worker succeeded.
pub fn run_threads<F>(alloc: &Allocator, threads: usize, f: F) -> Vec<(usize, Failure)>
where
    F: Fn(usize, &Allocator) -> Result<(), Failure> + Sync,
{
    let (tx, rx) = unbounded();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                let tx = tx.clone();
                let f = &f;
                s.spawn(move || {
                    if let Err(failure) = f(worker, alloc) {
                        let _ = tx.send((worker, failure));
                    }
                })
            })
            .collect();
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                let _ = tx.send((worker, Failure::Panicked { worker }));
            }
        }
    });
    drop(tx);

    let mut failures: Vec<_> = rx.into_iter().collect();
    failures.sort_by_key(|(worker, _)| *worker);
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_engine::AllocatorConfig;

    fn ready(size: usize, arenas: usize) -> Allocator {
        let mut alloc = Allocator::new();
        alloc.init(AllocatorConfig::new(size, arenas)).unwrap();
        alloc
    }

    #[test]
    fn pattern_round_trips() {
        let alloc = ready(256, 1);
        let mut block = alloc.allocate(40).unwrap();
        let bytes = write_pattern(&mut block, 10);
        assert_eq!(bytes.len(), 40);
        assert_eq!(verify_pattern(bytes), Ok(()));
    }

    #[test]
    fn verify_reports_first_mismatch() {
        let mut bytes = Vec::new();
        for k in [0i32, 1, 7, 3] {
            bytes.extend_from_slice(&k.to_ne_bytes());
        }
        assert_eq!(verify_pattern(&bytes), Err((2, 2, 7)));
    }

    #[test]
    fn workloads_pass_on_small_arena() {
        let alloc = ready(64, 1);
        assert_eq!(simple_cycles(&alloc, 100), Ok(()));
        assert_eq!(load_mixed(&alloc, 4), Ok(()));
    }

    #[test]
    fn alloc_errors_are_reported() {
        let alloc = Allocator::new();
        assert!(matches!(
            simple_cycles(&alloc, 1),
            Err(Failure::Alloc {
                context: "simple",
                iteration: 0,
                size: 16,
                ..
            })
        ));
    }

    #[test]
    fn run_threads_collects_failures_and_panics() {
        let alloc = ready(64, 2);
        let failures = run_threads(&alloc, 4, |worker, _| match worker {
            1 => Err(Failure::StringMismatch {
                iteration: 0,
                found: String::new(),
            }),
            3 => panic!("worker three"),
            _ => Ok(()),
        });
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].0, 1);
        assert_eq!(failures[1], (3, Failure::Panicked { worker: 3 }));
    }
}
