//! Integration test: lifecycle transitions across init / allocate / destroy.

use tessera_core::error::Operation;
use tessera_core::{AllocError, ConfigError, LifecycleState};
use tessera_engine::{Allocator, AllocatorConfig, RoutingPolicy};

#[test]
fn full_lifecycle_with_reinit() {
    let mut alloc = Allocator::new();
    assert_eq!(alloc.state(), LifecycleState::Uninitialized);

    for (size, arenas) in [(64, 1), (1024, 4), (16, 8)] {
        alloc.init(AllocatorConfig::new(size, arenas)).unwrap();
        assert_eq!(alloc.state(), LifecycleState::Ready);
        assert_eq!(alloc.num_arenas().unwrap().get(), arenas);
        assert_eq!(alloc.config().unwrap().default_arena_size, size);

        for n in 1..50 {
            let _ = alloc.allocate(n).unwrap();
        }

        let report = alloc.destroy().unwrap();
        assert_eq!(report.arenas, arenas);
        assert_eq!(alloc.state(), LifecycleState::Destroyed);
        assert!(alloc.stats().is_none());
        assert!(alloc.config().is_none());

        // Each Ready period gets its own ledger, balanced after teardown.
        let ledger = alloc.ledger().snapshot();
        assert!(ledger.is_balanced());
        assert_eq!(ledger.buffers_acquired as usize, report.buffers_released());
    }
}

#[test]
fn illegal_transitions_are_reported_not_applied() {
    let mut alloc = Allocator::new();

    let err = alloc.destroy().unwrap_err();
    assert_eq!(err.to_string(), "cannot destroy while allocator is uninitialized");

    alloc.init(AllocatorConfig::default()).unwrap();
    let err = alloc.init(AllocatorConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AllocError::InvalidState {
            operation: Operation::Init,
            state: LifecycleState::Ready
        }
    );
    assert_eq!(alloc.state(), LifecycleState::Ready);

    alloc.destroy().unwrap();
    assert!(alloc.destroy().is_err());
    assert!(alloc.allocate(8).is_err());
    assert_eq!(alloc.state(), LifecycleState::Destroyed);
}

#[test]
fn rejected_config_keeps_allocator_reusable() {
    let mut alloc = Allocator::new();
    assert_eq!(
        alloc.init(AllocatorConfig::new(1024, 0)),
        Err(AllocError::Config(ConfigError::ZeroArenaCount))
    );
    assert_eq!(
        alloc.init(AllocatorConfig::new(64, 4).with_memory_limit(100)),
        Err(AllocError::Config(ConfigError::MemoryLimitTooSmall {
            limit: 100,
            required: 256
        }))
    );
    assert_eq!(alloc.state(), LifecycleState::Uninitialized);
    alloc.init(AllocatorConfig::new(64, 4)).unwrap();
}

#[test]
fn independent_allocators_coexist() {
    let mut a = Allocator::new();
    let mut b = Allocator::new();
    a.init(AllocatorConfig::new(64, 2)).unwrap();
    b.init(AllocatorConfig::new(128, 3).with_routing(RoutingPolicy::ThreadHash))
        .unwrap();

    let _ = a.allocate(100).unwrap();
    let _ = b.allocate(10).unwrap();

    a.destroy().unwrap();
    assert_eq!(b.state(), LifecycleState::Ready);
    assert_eq!(b.stats().unwrap().total_allocations(), 1);
    assert_eq!(b.stats().unwrap().total_resizes(), 0);

    b.destroy().unwrap();
    assert!(a.ledger().snapshot().is_balanced());
    assert!(b.ledger().snapshot().is_balanced());
}

#[test]
fn out_of_memory_is_local_to_the_request() {
    let mut alloc = Allocator::new();
    alloc
        .init(AllocatorConfig::new(256, 2).with_memory_limit(2048))
        .unwrap();

    assert_eq!(
        alloc.allocate(4096).unwrap_err(),
        AllocError::OutOfMemory { requested: 8192 }
    );
    let stats = alloc.stats().unwrap();
    assert_eq!(stats.total_resizes(), 0);
    assert_eq!(stats.retired_buffers, 0);

    // A resize that fits under the limit still works afterwards.
    let block = alloc.allocate(300).unwrap();
    assert_eq!(block.len(), 300);

    alloc.destroy().unwrap();
    let ledger = alloc.ledger().snapshot();
    assert!(ledger.is_balanced());
    assert!(ledger.peak_live_bytes <= 2048);
}
