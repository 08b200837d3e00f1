//! Seeded allocate/release workloads.
//!
//! A workload is a flat list of [`Op`]s generated from a `ChaCha8Rng`, so
//! the same seed always reproduces the same sequence on every platform.
//! Release ops name a slot among the currently live handles rather than a
//! handle, which keeps a sequence valid no matter which allocations fail.

use carve_arena::{BlockHandle, BuddyAllocator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Request a block of this many bytes.
    Allocate(usize),
    /// Release the live handle at `slot % live.len()`. Ignored when
    /// nothing is live.
    Release(usize),
}

/// Shape of a generated workload.
#[derive(Clone, Debug)]
pub struct WorkloadSpec {
    /// RNG seed.
    pub seed: u64,
    /// Number of ops to generate.
    pub ops: usize,
    /// Largest request size in bytes (inclusive).
    pub max_size: usize,
    /// Probability that an op is an allocation.
    pub alloc_ratio: f64,
}

impl WorkloadSpec {
    /// A balanced workload: half allocations, requests up to `max_size`.
    pub fn new(seed: u64, ops: usize, max_size: usize) -> Self {
        Self {
            seed,
            ops,
            max_size,
            alloc_ratio: 0.5,
        }
    }

    /// Generate the op sequence.
    pub fn generate(&self) -> Vec<Op> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.ops)
            .map(|_| {
                if rng.random_bool(self.alloc_ratio) {
                    Op::Allocate(rng.random_range(0..=self.max_size))
                } else {
                    Op::Release(rng.random_range(0..usize::MAX))
                }
            })
            .collect()
    }
}

/// What was left after running a workload.
#[derive(Debug, Default)]
pub struct WorkloadOutcome {
    /// Handles still live, in allocation order except where releases
    /// swapped them.
    pub live: Vec<BlockHandle>,
    /// Allocations that succeeded.
    pub allocated: usize,
    /// Allocations that failed.
    pub failed: usize,
    /// Releases performed.
    pub released: usize,
}

/// Apply `ops` to `alloc`, calling `after_each` after every op.
pub fn run_workload_with(
    alloc: &mut BuddyAllocator,
    ops: &[Op],
    mut after_each: impl FnMut(&BuddyAllocator, &[BlockHandle]),
) -> WorkloadOutcome {
    let mut outcome = WorkloadOutcome::default();
    for &op in ops {
        match op {
            Op::Allocate(size) => match alloc.allocate(size) {
                Ok(handle) => {
                    outcome.live.push(handle);
                    outcome.allocated += 1;
                }
                Err(_) => outcome.failed += 1,
            },
            Op::Release(slot) => {
                if !outcome.live.is_empty() {
                    let handle = outcome.live.swap_remove(slot % outcome.live.len());
                    alloc.deallocate(handle);
                    outcome.released += 1;
                }
            }
        }
        after_each(alloc, &outcome.live);
    }
    outcome
}

/// Apply `ops` to `alloc`.
pub fn run_workload(alloc: &mut BuddyAllocator, ops: &[Op]) -> WorkloadOutcome {
    run_workload_with(alloc, ops, |_, _| {})
}
