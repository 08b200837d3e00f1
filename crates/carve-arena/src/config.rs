//! Allocator configuration parameters.

use crate::error::ArenaError;

/// Configuration for the buddy allocator.
///
/// Controls arena sizing, the smallest block the allocator will hand out,
/// and whether fresh allocations are zeroed. Validated at construction;
/// all values are immutable after creation.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Requested arena capacity in bytes.
    ///
    /// Rounded up to the next power of two at construction, so a hint of
    /// 1000 reserves a 1024-byte arena.
    pub capacity: usize,

    /// Smallest block size in bytes.
    ///
    /// Default: 1. Must be a power of two no larger than the rounded
    /// capacity. Every request is raised to at least this size, which
    /// bounds the number of free-list orders the allocator keeps.
    pub min_block_size: usize,

    /// Zero the requested region on every successful allocation.
    ///
    /// Default: true. Released bytes are never cleared, so without this a
    /// fresh block may hold whatever its previous owner wrote.
    pub zero_on_allocate: bool,
}

impl ArenaConfig {
    /// Default minimum block size: one byte.
    pub const DEFAULT_MIN_BLOCK_SIZE: usize = 1;

    /// Default arena capacity: 1 MiB.
    pub const DEFAULT_CAPACITY: usize = 1 << 20;

    /// Create a new config for the given capacity hint.
    ///
    /// Uses default values for all other parameters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            min_block_size: Self::DEFAULT_MIN_BLOCK_SIZE,
            zero_on_allocate: true,
        }
    }

    /// Set the minimum block size.
    pub fn with_min_block_size(mut self, min_block_size: usize) -> Self {
        self.min_block_size = min_block_size;
        self
    }

    /// Enable or disable zeroing on allocation.
    pub fn with_zero_on_allocate(mut self, zero: bool) -> Self {
        self.zero_on_allocate = zero;
        self
    }

    /// The arena capacity this config resolves to: the capacity hint
    /// rounded up to a power of two.
    pub fn rounded_capacity(&self) -> Result<usize, ArenaError> {
        carve_core::normalize(self.capacity).ok_or_else(|| ArenaError::InvalidConfig {
            reason: format!(
                "capacity {} cannot be rounded up to a power of two",
                self.capacity
            ),
        })
    }

    /// Check the config and return the rounded capacity.
    pub fn validate(&self) -> Result<usize, ArenaError> {
        let capacity = self.rounded_capacity()?;
        if !self.min_block_size.is_power_of_two() {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "min_block_size {} is not a power of two",
                    self.min_block_size
                ),
            });
        }
        if self.min_block_size > capacity {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "min_block_size {} exceeds arena capacity {capacity}",
                    self.min_block_size
                ),
            });
        }
        Ok(capacity)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
