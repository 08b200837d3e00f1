//! Assertion helpers over allocator state.

use carve_arena::{BlockHandle, BuddyAllocator};

/// Assert that no two handles cover overlapping bytes and that every
/// handle lies inside `[0, capacity)`.
pub fn assert_disjoint(handles: &[BlockHandle], capacity: usize) {
    let mut ranges: Vec<_> = handles.iter().map(|h| h.range()).collect();
    ranges.sort_unstable_by_key(|r| r.start);
    for r in &ranges {
        assert!(r.end <= capacity, "block {r:?} ends past capacity {capacity}");
    }
    for pair in ranges.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "blocks {:?} and {:?} overlap",
            pair[0],
            pair[1]
        );
    }
}

/// Assert that the allocator holds no live blocks and its free space is a
/// single block covering the whole arena.
pub fn assert_fully_free(alloc: &BuddyAllocator) {
    let stats = alloc.stats();
    assert_eq!(stats.used, 0, "expected no live bytes, stats:\n{stats}");
    assert_eq!(stats.free, stats.total);
    assert!(stats.live_blocks.is_empty());
    assert_eq!(
        stats.largest_free, stats.total,
        "free space not fully coalesced, stats:\n{stats}"
    );
}
