//! Usage reporting.
//!
//! [`ArenaStats`] is a read-only snapshot derived from the block index and
//! free lists. It has no way to mutate the allocator it came from.

use std::fmt;

use carve_core::{size_of_order, Order};

use crate::free_list::FreeLists;
use crate::index::BlockIndex;

/// Lifetime event counters kept by the allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocCounters {
    /// Successful allocations.
    pub allocations: u64,
    /// Successful releases.
    pub deallocations: u64,
    /// Allocations that failed with `OutOfMemory`.
    pub failed_allocations: u64,
    /// Releases ignored because the handle was invalid or stale.
    pub invalid_releases: u64,
    /// Blocks split in half while serving allocations.
    pub splits: u64,
    /// Buddy pairs merged while serving releases.
    pub merges: u64,
    /// Highest `used` byte count observed.
    pub peak_used: usize,
}

impl AllocCounters {
    pub(crate) fn record_allocation(&mut self, used: usize) {
        self.allocations += 1;
        self.peak_used = self.peak_used.max(used);
    }
}

/// A live block as reported by [`ArenaStats::live_blocks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveBlock {
    /// Starting offset within the arena.
    pub offset: usize,
    /// Block size in bytes.
    pub size: usize,
    /// Bytes the caller asked for.
    pub requested: usize,
}

/// Point-in-time usage report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Arena capacity in bytes.
    pub total: usize,
    /// Sum of live block sizes.
    pub used: usize,
    /// `total - used`.
    pub free: usize,
    /// Sum of requested lengths; `used - requested` is lost to rounding.
    pub requested: usize,
    /// Size of the largest free block.
    pub largest_free: usize,
    /// Live blocks, ascending by offset.
    pub live_blocks: Vec<LiveBlock>,
    /// Number of free blocks per order, ascending by order. Orders with no
    /// free blocks are omitted.
    pub free_blocks: Vec<(Order, usize)>,
    /// Lifetime counters.
    pub counters: AllocCounters,
}

impl ArenaStats {
    pub(crate) fn collect(
        capacity: usize,
        index: &BlockIndex,
        free: &FreeLists,
        counters: AllocCounters,
    ) -> Self {
        let used = index.used_bytes();
        let live_blocks = index
            .sorted()
            .into_iter()
            .map(|(offset, entry)| LiveBlock {
                offset,
                size: entry.size(),
                requested: entry.requested,
            })
            .collect();
        let free_blocks = free
            .orders()
            .map(|order| (order, free.count(order)))
            .filter(|&(_, count)| count > 0)
            .collect();

        Self {
            total: capacity,
            used,
            free: capacity - used,
            requested: index.requested_bytes(),
            largest_free: free.largest_free(),
            live_blocks,
            free_blocks,
            counters,
        }
    }

    /// Live blocks as `(offset, size)` pairs.
    pub fn live_ranges(&self) -> Vec<(usize, usize)> {
        self.live_blocks.iter().map(|b| (b.offset, b.size)).collect()
    }

    /// Bytes reserved beyond what callers requested.
    pub fn internal_fragmentation(&self) -> usize {
        self.used - self.requested
    }

    /// Free bytes outside the largest free block.
    ///
    /// Zero means all free space is one contiguous block.
    pub fn external_fragmentation(&self) -> usize {
        self.free - self.largest_free
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "memory status:")?;
        writeln!(f, "  total: {} bytes", self.total)?;
        writeln!(f, "  in use: {} bytes", self.used)?;
        writeln!(f, "  free: {} bytes", self.free)?;
        writeln!(f, "  largest free block: {} bytes", self.largest_free)?;
        writeln!(f, "allocated blocks:")?;
        for block in &self.live_blocks {
            writeln!(
                f,
                "  - offset: {}, size: {} bytes ({} requested)",
                block.offset, block.size, block.requested
            )?;
        }
        writeln!(f, "free blocks:")?;
        for &(order, count) in &self.free_blocks {
            writeln!(f, "  - {} x {} bytes", count, size_of_order(order))?;
        }
        Ok(())
    }
}
