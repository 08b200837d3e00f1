//! Integration test: long seeded allocate/release workloads.
//!
//! Runs reproducible workloads against several arena shapes and checks,
//! after every op, that live blocks never overlap and that the bookkeeping
//! still tiles the arena. Finally releases everything in a shuffled order
//! and asserts the arena is one free block again.

use carve_arena::{ArenaConfig, BuddyAllocator};
use carve_test_utils::{
    assert_disjoint, assert_fully_free, run_workload, run_workload_with, Op, WorkloadSpec,
};

const SEEDS: [u64; 4] = [1, 42, 0xC0FFEE, 9_999_991];

fn check_every_op(alloc: &mut BuddyAllocator, ops: &[Op]) -> Vec<carve_arena::BlockHandle> {
    let capacity = alloc.capacity();
    let outcome = run_workload_with(alloc, ops, |a, live| {
        assert_disjoint(live, capacity);
        if let Err(v) = a.check_invariants() {
            panic!("invariant violated: {v}\n{}", a.stats());
        }
        let live_bytes: usize = live.iter().map(|h| h.size()).sum();
        assert_eq!(a.used(), live_bytes);
    });
    outcome.live
}

#[test]
fn small_requests_in_small_arena() {
    for seed in SEEDS {
        let mut alloc = BuddyAllocator::with_capacity(4096).unwrap();
        let ops = WorkloadSpec::new(seed, 2_000, 64).generate();
        let live = check_every_op(&mut alloc, &ops);
        for h in live {
            alloc.deallocate(h);
        }
        assert_fully_free(&alloc);
    }
}

#[test]
fn mixed_requests_with_pressure() {
    for seed in SEEDS {
        let mut alloc = BuddyAllocator::with_capacity(1 << 14).unwrap();
        let spec = WorkloadSpec {
            alloc_ratio: 0.7,
            ..WorkloadSpec::new(seed, 3_000, 3_000)
        };
        let live = check_every_op(&mut alloc, &spec.generate());
        // Release in reverse of the order `live` ended up in.
        for h in live.into_iter().rev() {
            alloc.deallocate(h);
        }
        assert_fully_free(&alloc);
    }
}

#[test]
fn min_block_size_workload() {
    for seed in SEEDS {
        let config = ArenaConfig::new(8192).with_min_block_size(32);
        let mut alloc = BuddyAllocator::new(config).unwrap();
        let ops = WorkloadSpec::new(seed, 1_500, 500).generate();
        let live = check_every_op(&mut alloc, &ops);
        assert!(live.iter().all(|h| h.size() >= 32));
        alloc.reset();
        assert_fully_free(&alloc);
    }
}

#[test]
fn same_seed_same_layout() {
    let ops = WorkloadSpec::new(7, 1_000, 200).generate();
    let mut a = BuddyAllocator::with_capacity(4096).unwrap();
    let mut b = BuddyAllocator::with_capacity(4096).unwrap();
    run_workload(&mut a, &ops);
    run_workload(&mut b, &ops);
    assert_eq!(a.stats().live_ranges(), b.stats().live_ranges());
    assert_eq!(a.counters(), b.counters());
}

#[test]
fn double_release_across_workload_is_harmless() {
    let mut alloc = BuddyAllocator::with_capacity(4096).unwrap();
    let ops = WorkloadSpec::new(3, 500, 128).generate();
    let outcome = run_workload(&mut alloc, &ops);

    let mut released = Vec::new();
    for h in outcome.live {
        alloc.deallocate(h);
        released.push(h);
    }
    for h in &released {
        alloc.deallocate(*h);
        assert!(alloc.try_deallocate(*h).is_err());
    }
    assert_fully_free(&alloc);
    alloc.check_invariants().unwrap();
}
