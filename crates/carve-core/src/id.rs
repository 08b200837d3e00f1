//! Strongly-typed identifiers and the [`BlockHandle`] type.

use std::fmt;

use crate::order::size_of_order;

/// Base-2 logarithm of a block size.
///
/// A block of order `n` spans exactly `1 << n` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Order(pub u8);

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Order {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Allocation stamp carried by every handle.
///
/// Each successful allocation receives a fresh generation from a
/// per-allocator counter. A handle whose block has been released and whose
/// offset has since been handed out again carries an older generation than
/// the live block, so the reuse is detectable without tracking freed
/// handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Opaque reference to a live allocation.
///
/// Handles never expose addresses. They carry the block's starting offset
/// within the arena, its order, and the generation it was allocated in;
/// the allocator resolves them internally and rejects any handle that no
/// longer matches a live block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct BlockHandle {
    offset: usize,
    order: Order,
    generation: Generation,
}

impl BlockHandle {
    /// Create a new handle. Only the allocator should mint handles.
    #[doc(hidden)]
    pub fn new(offset: usize, order: Order, generation: Generation) -> Self {
        Self {
            offset,
            order,
            generation,
        }
    }

    /// Starting offset of the block within the arena.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Order of the block.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Size of the block in bytes (always a power of two).
    pub fn size(&self) -> usize {
        size_of_order(self.order)
    }

    /// Generation the block was allocated in.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Byte range `[offset, offset + size)` covered by the block.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.size()
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockHandle(off={}, size={}, gen={})",
            self.offset,
            self.size(),
            self.generation
        )
    }
}
