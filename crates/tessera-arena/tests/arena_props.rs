//! Property tests for single-arena bump allocation and resize bookkeeping.

use std::num::NonZeroUsize;
use std::sync::Arc;

use proptest::prelude::*;
use tessera_arena::{ArenaList, MemoryLedger, RetiredList, GROWTH_FACTOR};
use tessera_core::ArenaIndex;

/// Replays `sizes` against one arena and returns, per request, the
/// address range and the resize count observed after it.
fn replay(arena_size: usize, sizes: &[usize]) -> (Vec<(std::ops::Range<usize>, u64)>, usize) {
    let ledger = Arc::new(MemoryLedger::new());
    let retired = RetiredList::new();
    let list = ArenaList::new(arena_size, NonZeroUsize::MIN, &ledger).unwrap();
    let arena = list.get(ArenaIndex(0)).unwrap();

    let mut out = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let block = arena.allocate(size, &retired, &ledger).unwrap();
        assert_eq!(block.len(), size);
        out.push((block.addr_range(), arena.stats().resizes));
    }
    (out, retired.len())
}

proptest! {
    #[test]
    fn blocks_in_one_buffer_never_overlap(
        arena_size in 1usize..4096,
        sizes in prop::collection::vec(1usize..512, 1..64),
    ) {
        let (blocks, _) = replay(arena_size, &sizes);
        // Group by buffer generation (resize count) and check pairwise.
        for (i, (a, gen_a)) in blocks.iter().enumerate() {
            for (b, gen_b) in &blocks[i + 1..] {
                if gen_a == gen_b {
                    prop_assert!(a.end <= b.start || b.end <= a.start,
                        "overlap {:?} / {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn remaining_tracks_cursor(
        arena_size in 1usize..4096,
        sizes in prop::collection::vec(1usize..512, 1..64),
    ) {
        let ledger = Arc::new(MemoryLedger::new());
        let retired = RetiredList::new();
        let list = ArenaList::new(arena_size, NonZeroUsize::MIN, &ledger).unwrap();
        let arena = list.get(ArenaIndex(0)).unwrap();
        for &size in &sizes {
            let _block = arena.allocate(size, &retired, &ledger).unwrap();
            let s = arena.stats();
            prop_assert_eq!(s.remaining, s.capacity - s.used);
            prop_assert!(s.remaining <= s.capacity);
        }
    }

    #[test]
    fn each_overflow_retires_exactly_one_buffer(
        arena_size in 1usize..2048,
        sizes in prop::collection::vec(1usize..1024, 1..48),
    ) {
        // Model the growth policy independently and compare.
        let mut remaining = arena_size;
        let mut expected_resizes = 0usize;
        let mut expected_capacity = arena_size;
        for &size in &sizes {
            if size > remaining {
                expected_resizes += 1;
                expected_capacity = GROWTH_FACTOR * size;
                remaining = expected_capacity;
            }
            remaining -= size;
        }

        let ledger = Arc::new(MemoryLedger::new());
        let mut retired = RetiredList::new();
        let list = ArenaList::new(arena_size, NonZeroUsize::MIN, &ledger).unwrap();
        let arena = list.get(ArenaIndex(0)).unwrap();
        for &size in &sizes {
            let _ = arena.allocate(size, &retired, &ledger).unwrap();
        }

        let s = arena.stats();
        prop_assert_eq!(s.resizes as usize, expected_resizes);
        prop_assert_eq!(s.capacity, expected_capacity);
        prop_assert_eq!(s.remaining, remaining);
        prop_assert_eq!(retired.len(), expected_resizes);

        drop(list);
        retired.release_all();
        prop_assert!(ledger.snapshot().is_balanced());
    }
}

#[test]
fn resize_count_matches_retired_len() {
    let (_, retired) = replay(100, &[60, 60, 60, 200, 1]);
    // 60 fits; 60 > 40 resizes to 120; 60 fits exactly; 200 > 0 resizes; 1 fits.
    assert_eq!(retired, 2);
}
