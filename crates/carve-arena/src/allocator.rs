//! The buddy allocator.
//!
//! [`BuddyAllocator`] owns an [`Arena`] and carves it into power-of-two
//! blocks. Allocation takes the lowest free block of the smallest
//! sufficient order and splits it in half until it matches the request;
//! each split leaves the upper half on the next-lower free list. Release
//! walks the other way, merging the block with its buddy for as long as
//! the buddy is wholly free.
//!
//! ```text
//! allocate(100) on a 1024-byte arena:
//!
//!   [              1024 @0              ]   pop order 10
//!   [      512 @0      ][    512 @512    ]   split -> free 512
//!   [ 256 @0 ][ 256 @256 ]                   split -> free 256
//!   [128@0][128@128]                         split -> free 128
//!   ^ handle(offset=0, size=128)
//! ```

use carve_core::{buddy_of, normalize, order_of, size_of_order, BlockHandle, Generation, Order};
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::free_list::FreeLists;
use crate::index::{BlockEntry, BlockIndex};
use crate::invariants::{self, InvariantViolation};
use crate::stats::{AllocCounters, ArenaStats};

/// Fixed-arena power-of-two buddy allocator.
///
/// All mutation goes through `&mut self`; share it across threads by
/// wrapping it in a `Mutex`.
pub struct BuddyAllocator {
    arena: Arena,
    index: BlockIndex,
    free: FreeLists,
    min_order: Order,
    max_order: Order,
    zero_on_allocate: bool,
    next_generation: Generation,
    counters: AllocCounters,
}

impl BuddyAllocator {
    /// Create an allocator from a validated config.
    ///
    /// Reserves the full arena up front. Fails with
    /// [`ArenaError::InvalidConfig`] if the config is rejected.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        let capacity = config.validate()?;
        let min_order = order_of(config.min_block_size);
        let max_order = order_of(capacity);

        debug!(
            capacity,
            min_block_size = config.min_block_size,
            "buddy allocator created"
        );

        Ok(Self {
            arena: Arena::new(capacity),
            index: BlockIndex::new(),
            free: FreeLists::new(min_order, max_order),
            min_order,
            max_order,
            zero_on_allocate: config.zero_on_allocate,
            next_generation: Generation(1),
            counters: AllocCounters::default(),
        })
    }

    /// Create an allocator with default settings for the given capacity
    /// hint, rounded up to the next power of two.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig::new(capacity))
    }

    /// Arena capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Smallest block size this allocator hands out.
    pub fn min_block_size(&self) -> usize {
        size_of_order(self.min_order)
    }

    /// Block size a request of `size` bytes would occupy, or `None` if it
    /// can never fit in this arena.
    pub fn block_size_for(&self, size: usize) -> Option<usize> {
        let normalized = normalize(size)?.max(self.min_block_size());
        (normalized <= self.capacity()).then_some(normalized)
    }

    /// Allocate a block holding at least `size` bytes.
    ///
    /// Zero-byte requests receive a minimum-size block whose data slice is
    /// empty. Fails with [`ArenaError::OutOfMemory`] when no free block of
    /// the normalized size exists; a failed call changes nothing but the
    /// failure counter.
    pub fn allocate(&mut self, size: usize) -> Result<BlockHandle, ArenaError> {
        let Some(block_size) = self.block_size_for(size) else {
            return Err(self.out_of_memory(size));
        };
        let target = order_of(block_size);

        let Some(found) = self.free.smallest_available(target) else {
            return Err(self.out_of_memory(size));
        };
        let Some(offset) = self.free.pop_lowest(found) else {
            return Err(self.out_of_memory(size));
        };

        self.split(offset, found, target);

        let generation = self.next_generation;
        self.next_generation = generation.next();
        let entry = BlockEntry {
            order: target,
            requested: size,
            generation,
        };
        self.index.insert(offset, entry);
        self.counters.record_allocation(self.index.used_bytes());

        if self.zero_on_allocate {
            self.arena.zero(offset, size);
        }

        trace!(offset, size, order = target.0, "allocate");
        Ok(entry.handle(offset))
    }

    /// Split the free block at `offset` from `from` down to `to`, pushing
    /// each upper half onto its free list. The lower half is kept.
    fn split(&mut self, offset: usize, from: Order, to: Order) {
        let mut order = from;
        while order > to {
            order = Order(order.0 - 1);
            self.free.push(order, offset + size_of_order(order));
            self.counters.splits += 1;
        }
        if from > to {
            debug!(offset, from = from.0, to = to.0, "split block");
        }
    }

    fn out_of_memory(&mut self, requested: usize) -> ArenaError {
        self.counters.failed_allocations += 1;
        let largest_free = self.free.largest_free();
        let normalized = normalize(requested).map(|n| n.max(self.min_block_size()));
        debug!(requested, ?normalized, largest_free, "allocation failed");
        ArenaError::OutOfMemory {
            requested,
            normalized,
            largest_free,
        }
    }

    /// Release the block referred to by `handle`.
    ///
    /// Releasing an unknown, already-released or stale handle is a no-op:
    /// it never touches the index or the arena. Use
    /// [`try_deallocate`](Self::try_deallocate) to observe such misuse.
    pub fn deallocate(&mut self, handle: BlockHandle) {
        if let Err(err) = self.try_deallocate(handle) {
            debug!(%err, "ignored release");
        }
    }

    /// Release the block referred to by `handle`, reporting invalid or
    /// stale handles as errors.
    ///
    /// On error the allocator state is unchanged apart from the
    /// invalid-release counter.
    pub fn try_deallocate(&mut self, handle: BlockHandle) -> Result<(), ArenaError> {
        if let Err(err) = self.resolve(handle).map(|_| ()) {
            self.counters.invalid_releases += 1;
            return Err(err);
        }
        let offset = handle.offset();
        let Some(entry) = self.index.remove(offset) else {
            self.counters.invalid_releases += 1;
            return Err(ArenaError::InvalidHandle { offset });
        };
        self.counters.deallocations += 1;
        trace!(offset, order = entry.order.0, "deallocate");
        self.coalesce(offset, entry.order);
        Ok(())
    }

    /// Merge the freed block with its buddy while the buddy is free, then
    /// push the result onto its free list.
    fn coalesce(&mut self, mut offset: usize, mut order: Order) {
        let start = order;
        while order < self.max_order {
            let buddy = buddy_of(offset, order);
            if !self.free.remove(order, buddy) {
                break;
            }
            offset = offset.min(buddy);
            order = Order(order.0 + 1);
            self.counters.merges += 1;
        }
        if order > start {
            debug!(offset, from = start.0, to = order.0, "merged buddies");
        }
        self.free.push(order, offset);
    }

    /// Look up the live entry `handle` refers to.
    fn resolve(&self, handle: BlockHandle) -> Result<&BlockEntry, ArenaError> {
        let offset = handle.offset();
        let entry = self
            .index
            .get(offset)
            .ok_or(ArenaError::InvalidHandle { offset })?;
        if entry.generation != handle.generation() || entry.order != handle.order() {
            return Err(ArenaError::StaleHandle {
                offset,
                handle_generation: handle.generation(),
                live_generation: entry.generation,
            });
        }
        Ok(entry)
    }

    /// Whether `handle` refers to a live block.
    pub fn contains(&self, handle: BlockHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// The handle of the block currently live at `offset`, if any.
    pub fn handle_at(&self, offset: usize) -> Option<BlockHandle> {
        self.index.get(offset).map(|entry| entry.handle(offset))
    }

    /// Shared view of the bytes a live handle requested.
    pub fn data(&self, handle: BlockHandle) -> Result<&[u8], ArenaError> {
        let requested = self.resolve(handle)?.requested;
        Ok(self.arena.slice(handle.offset(), requested))
    }

    /// Mutable view of the bytes a live handle requested.
    pub fn data_mut(&mut self, handle: BlockHandle) -> Result<&mut [u8], ArenaError> {
        let requested = self.resolve(handle)?.requested;
        Ok(self.arena.slice_mut(handle.offset(), requested))
    }

    /// Release every live block at once.
    ///
    /// All outstanding handles become invalid. Generations keep counting
    /// so handles from before the reset are never mistaken for new ones.
    pub fn reset(&mut self) {
        let released = self.index.len() as u64;
        self.index.clear();
        self.free.reset();
        self.counters.deallocations += released;
        debug!(released, "allocator reset");
    }

    /// Number of live blocks.
    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    /// Bytes currently allocated, counted in whole blocks.
    pub fn used(&self) -> usize {
        self.index.used_bytes()
    }

    /// Bytes not covered by any live block.
    pub fn free_bytes(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Lifetime event counters.
    pub fn counters(&self) -> AllocCounters {
        self.counters
    }

    /// Usage report derived from the block index.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats::collect(self.capacity(), &self.index, &self.free, self.counters)
    }

    /// Verify that live and free blocks tile the arena exactly and that
    /// free space is fully coalesced.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        invariants::check(self.capacity(), &self.index, &self.free)
    }
}
