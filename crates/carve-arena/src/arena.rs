//! The fixed backing buffer.
//!
//! An [`Arena`] is a single contiguous `Vec<u8>` reserved once at
//! construction. It carries no structure of its own: which bytes belong to
//! which block is recorded entirely in the block index and free lists.

/// A fixed-length, power-of-two sized byte buffer.
///
/// The arena is never resized. Bytes released by the allocator keep their
/// last contents until the region is handed out again.
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<u8>,
}

impl Arena {
    /// Create a zero-initialised arena of `capacity` bytes.
    ///
    /// `capacity` must already be a power of two.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            data: vec![0; capacity],
        }
    }

    /// Get a shared slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the arena capacity.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    /// Get a mutable slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the arena capacity.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }

    /// Zero `len` bytes starting at `offset`.
    pub fn zero(&mut self, offset: usize, len: usize) {
        self.slice_mut(offset, len).fill(0);
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_zeroed() {
        let arena = Arena::new(1024);
        assert_eq!(arena.capacity(), 1024);
        assert!(arena.slice(0, 1024).iter().all(|&b| b == 0));
    }

    #[test]
    fn slice_reads_written_data() {
        let mut arena = Arena::new(256);
        {
            let s = arena.slice_mut(64, 4);
            s.copy_from_slice(&[1, 2, 3, 4]);
        }
        assert_eq!(arena.slice(64, 4), &[1, 2, 3, 4]);
        assert_eq!(arena.slice(60, 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn zero_clears_only_the_range() {
        let mut arena = Arena::new(16);
        arena.slice_mut(0, 16).fill(0xAA);
        arena.zero(4, 8);
        assert_eq!(arena.slice(0, 4), &[0xAA; 4]);
        assert_eq!(arena.slice(4, 8), &[0; 8]);
        assert_eq!(arena.slice(12, 4), &[0xAA; 4]);
    }

    #[test]
    #[should_panic]
    fn slice_past_end_panics() {
        let arena = Arena::new(16);
        let _ = arena.slice(8, 16);
    }
}
