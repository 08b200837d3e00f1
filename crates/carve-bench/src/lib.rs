//! Benchmark profiles for the Carve buddy allocator.
//!
//! - [`image_buffer_profile`]: requests sized like `rows × cols × channels`
//!   image buffers, the allocator's primary consumer.
//! - [`churn_profile`]: a seeded mixed workload of small requests.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use carve_arena::{ArenaConfig, BuddyAllocator};
use carve_test_utils::{Op, WorkloadSpec};

/// Image shapes `(rows, cols, channels)` used by [`image_buffer_profile`].
pub const IMAGE_SHAPES: [(usize, usize, usize); 4] =
    [(64, 64, 3), (120, 160, 3), (240, 320, 3), (480, 640, 1)];

/// Byte sizes for a batch of image buffers, one per shape, repeated
/// `rounds` times.
pub fn image_buffer_profile(rounds: usize) -> Vec<usize> {
    (0..rounds)
        .flat_map(|_| IMAGE_SHAPES.iter().map(|&(r, c, ch)| r * c * ch))
        .collect()
}

/// Allocator large enough to hold one of every [`IMAGE_SHAPES`] buffer at
/// once.
pub fn image_arena() -> BuddyAllocator {
    let capacity: usize = image_buffer_profile(1).iter().map(|&s| s.next_power_of_two()).sum();
    // Zeroing would dominate large-buffer timings.
    let config = ArenaConfig::new(capacity).with_zero_on_allocate(false);
    BuddyAllocator::new(config).unwrap()
}

/// Seeded churn workload of `ops` operations with requests up to 512
/// bytes.
pub fn churn_profile(seed: u64, ops: usize) -> Vec<Op> {
    WorkloadSpec::new(seed, ops, 512).generate()
}
