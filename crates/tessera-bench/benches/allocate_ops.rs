//! Criterion micro-benchmarks for single-threaded allocation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tessera_bench::{request_sizes, serial_profile};
use tessera_engine::Allocator;

const BATCH: usize = 1000;

fn ready() -> Allocator {
    let mut alloc = Allocator::new();
    alloc.init(serial_profile()).unwrap();
    alloc
}

/// Benchmark: 1000 × 16-byte bump allocations on a fresh allocator.
fn bench_bump_16(c: &mut Criterion) {
    c.bench_function("bump_16_x1000", |b| {
        b.iter_batched(
            ready,
            |alloc| {
                for _ in 0..BATCH {
                    black_box(alloc.allocate(16).unwrap().as_ptr());
                }
                alloc
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: request pairs that force one arena resize each.
fn bench_resize_churn(c: &mut Criterion) {
    c.bench_function("resize_churn_x1000", |b| {
        b.iter_batched(
            ready,
            |alloc| {
                // 601 bytes never fit behind 600 in a 1202-byte buffer.
                for _ in 0..BATCH {
                    black_box(alloc.allocate(600).unwrap().as_ptr());
                    black_box(alloc.allocate(601).unwrap().as_ptr());
                }
                alloc
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: mixed request sizes, including the write of each block.
fn bench_mixed_write(c: &mut Criterion) {
    let sizes = request_sizes(BATCH, 512, 42);
    c.bench_function("mixed_write_x1000", |b| {
        b.iter_batched(
            ready,
            |alloc| {
                for &size in &sizes {
                    let mut block = alloc.allocate(size).unwrap();
                    black_box(block.fill(0xA5).len());
                }
                alloc
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: full init + destroy cycle.
fn bench_lifecycle(c: &mut Criterion) {
    c.bench_function("init_destroy", |b| {
        b.iter(|| {
            let mut alloc = ready();
            black_box(alloc.destroy().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_bump_16,
    bench_resize_churn,
    bench_mixed_write,
    bench_lifecycle
);
criterion_main!(benches);
