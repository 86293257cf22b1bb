//! Integration test: thread-to-arena routing through the allocator.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Barrier;

use tessera_core::{ArenaIndex, ArenaRouter};
use tessera_engine::{Allocator, AllocatorConfig, RoundRobinRouter, RoutingPolicy};

fn arenas_hit(alloc: &Allocator, threads: usize) -> Vec<ArenaIndex> {
    let barrier = Barrier::new(threads);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let first = alloc.allocate(8).unwrap().arena();
                    for _ in 0..100 {
                        assert_eq!(alloc.allocate(8).unwrap().arena(), first);
                    }
                    first
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn up_to_k_threads_get_distinct_arenas() {
    let mut alloc = Allocator::new();
    alloc.init(AllocatorConfig::new(256, 4)).unwrap();

    let hit: HashSet<_> = arenas_hit(&alloc, 4).into_iter().collect();
    assert_eq!(hit.len(), 4);
}

#[test]
fn more_threads_than_arenas_balance_evenly() {
    let mut alloc = Allocator::new();
    alloc.init(AllocatorConfig::new(256, 3)).unwrap();

    let mut per_arena = [0usize; 3];
    for index in arenas_hit(&alloc, 7) {
        per_arena[index.get()] += 1;
    }
    let max = per_arena.iter().max().unwrap();
    let min = per_arena.iter().min().unwrap();
    assert!(max - min <= 1, "uneven spread {per_arena:?}");
}

#[test]
fn reinit_restarts_ticketing() {
    let mut alloc = Allocator::new();
    alloc.init(AllocatorConfig::new(64, 2)).unwrap();
    let before = alloc.current_arena().unwrap();
    alloc.destroy().unwrap();

    alloc.init(AllocatorConfig::new(64, 2)).unwrap();
    // A fresh router hands this thread the first ticket again.
    assert_eq!(alloc.current_arena(), Some(ArenaIndex(0)));
    assert_eq!(before, ArenaIndex(0));
}

#[test]
fn thread_hash_policy_stays_in_range() {
    let mut alloc = Allocator::new();
    alloc
        .init(AllocatorConfig::new(64, 5).with_routing(RoutingPolicy::ThreadHash))
        .unwrap();
    for index in arenas_hit(&alloc, 12) {
        assert!(index.get() < 5);
    }
}

#[test]
fn shared_router_instance_is_usable_directly() {
    let router = RoundRobinRouter::new();
    let k = NonZeroUsize::new(2).unwrap();
    let mine = router.route(k);
    let other = std::thread::scope(|s| s.spawn(|| router.route(k)).join().unwrap());
    assert_ne!(mine, other);
    assert_eq!(router.threads_seen(), 2);
    assert_eq!(router.name(), "round-robin");
}
