//! The block index: the authoritative record of live allocations.
//!
//! [`BlockIndex`] maps each live block's starting offset to a
//! [`BlockEntry`]. Anything not in the index is free; the free lists are a
//! derived view that must always agree with it.

use carve_core::{size_of_order, BlockHandle, Generation, Order};
use indexmap::IndexMap;

/// Bookkeeping for one live block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEntry {
    /// Order of the block; its size is `1 << order`.
    pub order: Order,
    /// Bytes the caller asked for. Never more than the block size.
    pub requested: usize,
    /// Generation the block was allocated in.
    pub generation: Generation,
}

impl BlockEntry {
    /// Size of the block in bytes.
    pub fn size(&self) -> usize {
        size_of_order(self.order)
    }

    /// The handle that refers to this entry at `offset`.
    pub fn handle(&self, offset: usize) -> BlockHandle {
        BlockHandle::new(offset, self.order, self.generation)
    }
}

/// Offset-keyed table of live blocks with running byte totals.
#[derive(Default)]
pub struct BlockIndex {
    entries: IndexMap<usize, BlockEntry>,
    /// Sum of block sizes over all entries.
    used: usize,
    /// Sum of requested lengths over all entries.
    requested: usize,
}

impl BlockIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly allocated block.
    ///
    /// The caller guarantees `offset` is not already live.
    pub fn insert(&mut self, offset: usize, entry: BlockEntry) {
        self.used += entry.size();
        self.requested += entry.requested;
        let previous = self.entries.insert(offset, entry);
        debug_assert!(previous.is_none(), "offset {offset} already live");
    }

    /// Remove the block starting at `offset`, returning its entry.
    pub fn remove(&mut self, offset: usize) -> Option<BlockEntry> {
        let entry = self.entries.swap_remove(&offset)?;
        self.used -= entry.size();
        self.requested -= entry.requested;
        Some(entry)
    }

    /// Look up the block starting at `offset`.
    pub fn get(&self, offset: usize) -> Option<&BlockEntry> {
        self.entries.get(&offset)
    }

    /// Whether a block starts at `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.entries.contains_key(&offset)
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no blocks are live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of live block sizes in bytes.
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    /// Sum of requested lengths over live blocks.
    pub fn requested_bytes(&self) -> usize {
        self.requested
    }

    /// Iterate over `(offset, entry)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BlockEntry)> {
        self.entries.iter().map(|(&offset, entry)| (offset, entry))
    }

    /// All live blocks as `(offset, entry)`, ascending by offset.
    pub fn sorted(&self) -> Vec<(usize, BlockEntry)> {
        let mut blocks: Vec<_> = self.entries.iter().map(|(&o, &e)| (o, e)).collect();
        blocks.sort_unstable_by_key(|&(offset, _)| offset);
        blocks
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.used = 0;
        self.requested = 0;
    }
}
