//! Criterion micro-benchmarks for allocate, release, and coalescing.

use std::hint::black_box;

use carve_arena::BuddyAllocator;
use carve_bench::{churn_profile, image_arena, image_buffer_profile};
use carve_test_utils::run_workload;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

/// Benchmark: allocate and immediately release a 64-byte block.
fn bench_alloc_free_pair(c: &mut Criterion) {
    let mut alloc = BuddyAllocator::with_capacity(1 << 20).unwrap();
    c.bench_function("alloc_free_pair_64b", |b| {
        b.iter(|| {
            let h = alloc.allocate(black_box(64)).unwrap();
            alloc.deallocate(black_box(h));
        });
    });
}

/// Benchmark: fill a 64 KiB arena with 64-byte blocks, then release them
/// all so every release cascades merges back to the top.
fn bench_fill_and_drain(c: &mut Criterion) {
    c.bench_function("fill_and_drain_64k", |b| {
        b.iter_batched(
            || BuddyAllocator::with_capacity(1 << 16).unwrap(),
            |mut alloc| {
                let handles: Vec<_> = (0..1024).map(|_| alloc.allocate(64).unwrap()).collect();
                for h in handles {
                    alloc.deallocate(h);
                }
                black_box(alloc.stats().largest_free);
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: allocate one buffer per image shape, then release them.
fn bench_image_buffers(c: &mut Criterion) {
    let sizes = image_buffer_profile(1);
    let mut alloc = image_arena();
    c.bench_function("image_buffers", |b| {
        b.iter(|| {
            let handles: Vec<_> = sizes.iter().map(|&s| alloc.allocate(s).unwrap()).collect();
            for h in handles {
                alloc.deallocate(h);
            }
        });
    });
}

/// Benchmark: 10K-op seeded churn workload.
fn bench_churn(c: &mut Criterion) {
    let ops = churn_profile(42, 10_000);
    c.bench_function("churn_10k", |b| {
        b.iter_batched(
            || BuddyAllocator::with_capacity(1 << 18).unwrap(),
            |mut alloc| black_box(run_workload(&mut alloc, &ops).allocated),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_alloc_free_pair,
    bench_fill_and_drain,
    bench_image_buffers,
    bench_churn
);
criterion_main!(benches);
