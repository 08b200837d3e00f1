//! Structural consistency checks.
//!
//! The allocator state is valid when the live blocks and free blocks
//! together tile `[0, capacity)` exactly, every block is aligned to its own
//! size, and no two free buddies of the same order coexist. These checks
//! are `O(n log n)` in the number of blocks and meant for tests and
//! debugging, not the allocation path.

use std::error::Error;
use std::fmt;

use carve_core::{buddy_of, size_of_order, Order};

use crate::free_list::FreeLists;
use crate::index::BlockIndex;

/// What kind of inconsistency was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// A block's offset is not a multiple of its size.
    Misaligned,
    /// A block extends past the arena capacity.
    OutOfBounds,
    /// A block's order is outside the tracked order range.
    OrderOutOfRange,
    /// Two blocks share bytes.
    Overlap,
    /// Live and free blocks do not add up to the capacity.
    Accounting,
    /// Two free buddies of equal order were left unmerged.
    Uncoalesced,
}

/// A failed consistency check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Category of the failure.
    pub kind: ViolationKind,
    /// Offset of the offending block.
    pub offset: usize,
    /// Human-readable description.
    pub detail: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at offset {}: {}", self.kind, self.offset, self.detail)
    }
}

impl Error for InvariantViolation {}

fn violation(kind: ViolationKind, offset: usize, detail: String) -> InvariantViolation {
    InvariantViolation {
        kind,
        offset,
        detail,
    }
}

/// Whether a block is free or live, for reporting.
#[derive(Clone, Copy)]
enum Owner {
    Live,
    Free,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Free => write!(f, "free"),
        }
    }
}

fn check_block(
    owner: Owner,
    offset: usize,
    order: Order,
    capacity: usize,
    free: &FreeLists,
) -> Result<(), InvariantViolation> {
    if order < free.min_order() || order > free.max_order() {
        return Err(violation(
            ViolationKind::OrderOutOfRange,
            offset,
            format!(
                "{owner} block of order {order} outside [{}, {}]",
                free.min_order(),
                free.max_order()
            ),
        ));
    }
    let size = size_of_order(order);
    if offset % size != 0 {
        return Err(violation(
            ViolationKind::Misaligned,
            offset,
            format!("{owner} block of {size} bytes is not aligned to its size"),
        ));
    }
    if offset.checked_add(size).is_none_or(|end| end > capacity) {
        return Err(violation(
            ViolationKind::OutOfBounds,
            offset,
            format!("{owner} block of {size} bytes ends past capacity {capacity}"),
        ));
    }
    Ok(())
}

/// Verify the allocator's bookkeeping against every structural invariant.
pub fn check(
    capacity: usize,
    index: &BlockIndex,
    free: &FreeLists,
) -> Result<(), InvariantViolation> {
    let mut blocks: Vec<(usize, usize, Owner)> = Vec::with_capacity(index.len());

    let mut live_sum = 0usize;
    for (offset, entry) in index.iter() {
        check_block(Owner::Live, offset, entry.order, capacity, free)?;
        if entry.requested > entry.size() {
            return Err(violation(
                ViolationKind::Accounting,
                offset,
                format!(
                    "requested {} bytes exceeds block size {}",
                    entry.requested,
                    entry.size()
                ),
            ));
        }
        live_sum += entry.size();
        blocks.push((offset, entry.size(), Owner::Live));
    }
    if live_sum != index.used_bytes() {
        return Err(violation(
            ViolationKind::Accounting,
            0,
            format!(
                "index reports {} used bytes, entries sum to {live_sum}",
                index.used_bytes()
            ),
        ));
    }

    for (order, offset) in free.iter() {
        check_block(Owner::Free, offset, order, capacity, free)?;
        if order < free.max_order() && free.contains(order, buddy_of(offset, order)) {
            return Err(violation(
                ViolationKind::Uncoalesced,
                offset,
                format!(
                    "free block of order {order} has a free buddy at {}",
                    buddy_of(offset, order)
                ),
            ));
        }
        blocks.push((offset, size_of_order(order), Owner::Free));
    }

    blocks.sort_unstable_by_key(|&(offset, _, _)| offset);
    let mut cursor = 0usize;
    for &(offset, size, owner) in &blocks {
        if offset < cursor {
            return Err(violation(
                ViolationKind::Overlap,
                offset,
                format!("{owner} block of {size} bytes starts inside a previous block ending at {cursor}"),
            ));
        }
        if offset > cursor {
            return Err(violation(
                ViolationKind::Accounting,
                cursor,
                format!("{} bytes are neither live nor free", offset - cursor),
            ));
        }
        cursor = offset + size;
    }
    if cursor != capacity {
        return Err(violation(
            ViolationKind::Accounting,
            cursor,
            format!("blocks cover {cursor} of {capacity} bytes"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::BlockEntry;
    use carve_core::Generation;

    fn live(order: u8) -> BlockEntry {
        BlockEntry {
            order: Order(order),
            requested: 1,
            generation: Generation(1),
        }
    }

    #[test]
    fn fresh_state_is_valid() {
        let index = BlockIndex::new();
        let free = FreeLists::new(Order(0), Order(10));
        assert_eq!(check(1024, &index, &free), Ok(()));
    }

    #[test]
    fn split_state_is_valid() {
        let mut index = BlockIndex::new();
        let mut free = FreeLists::new(Order(0), Order(10));
        free.pop_lowest(Order(10));
        index.insert(0, live(7));
        free.push(Order(7), 128);
        free.push(Order(8), 256);
        free.push(Order(9), 512);
        assert_eq!(check(1024, &index, &free), Ok(()));
    }

    #[test]
    fn detects_uncoalesced_buddies() {
        let index = BlockIndex::new();
        let mut free = FreeLists::new(Order(0), Order(2));
        free.pop_lowest(Order(2));
        free.push(Order(1), 0);
        free.push(Order(1), 2);
        let err = check(4, &index, &free).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Uncoalesced);
    }

    #[test]
    fn detects_overlap() {
        let mut index = BlockIndex::new();
        let free = FreeLists::new(Order(0), Order(4));
        index.insert(0, live(2));
        let err = check(16, &index, &free).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Overlap);
    }

    #[test]
    fn detects_leaked_bytes() {
        let index = BlockIndex::new();
        let mut free = FreeLists::new(Order(0), Order(4));
        free.pop_lowest(Order(4));
        free.push(Order(3), 0);
        let err = check(16, &index, &free).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Accounting);
    }

    #[test]
    fn detects_misalignment() {
        let mut index = BlockIndex::new();
        let mut free = FreeLists::new(Order(0), Order(4));
        free.pop_lowest(Order(4));
        index.insert(4, live(3));
        let err = check(16, &index, &free).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Misaligned);
    }
}
