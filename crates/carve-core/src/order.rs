//! Power-of-two size arithmetic.
//!
//! Every block the allocator hands out has a size of `1 << order` bytes and
//! starts at an offset that is a multiple of its size. The functions here
//! are the only place that arithmetic lives.

use crate::id::Order;

/// Round `requested` up to the smallest power of two that holds it.
///
/// `normalize(0)` is `Some(1)`: a zero-byte request still occupies the
/// smallest possible block. Returns `None` if the result does not fit in
/// `usize`.
#[inline]
pub fn normalize(requested: usize) -> Option<usize> {
    requested.max(1).checked_next_power_of_two()
}

/// Order (log2) of a power-of-two `size`.
///
/// For sizes that are not a power of two this returns the order of the
/// largest power of two below `size`; callers normalize first.
#[inline]
pub fn order_of(size: usize) -> Order {
    debug_assert!(size.is_power_of_two(), "order_of({size}) on non power of two");
    Order(size.trailing_zeros() as u8)
}

/// Size in bytes of a block of the given order.
#[inline]
pub fn size_of_order(order: Order) -> usize {
    1usize << order.0
}

/// Offset of the buddy of the block `[offset, offset + 2^order)`.
///
/// Buddies differ only in bit `order` of their offsets.
#[inline]
pub fn buddy_of(offset: usize, order: Order) -> usize {
    offset ^ size_of_order(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rounds_up() {
        assert_eq!(normalize(1), Some(1));
        assert_eq!(normalize(2), Some(2));
        assert_eq!(normalize(3), Some(4));
        assert_eq!(normalize(50), Some(64));
        assert_eq!(normalize(100), Some(128));
        assert_eq!(normalize(1000), Some(1024));
        assert_eq!(normalize(1024), Some(1024));
        assert_eq!(normalize(1025), Some(2048));
    }

    #[test]
    fn normalize_zero_is_one() {
        assert_eq!(normalize(0), Some(1));
    }

    #[test]
    fn normalize_overflow_is_none() {
        assert_eq!(normalize(usize::MAX), None);
        assert_eq!(normalize((1usize << (usize::BITS - 1)) + 1), None);
        assert_eq!(
            normalize(1usize << (usize::BITS - 1)),
            Some(1usize << (usize::BITS - 1))
        );
    }

    #[test]
    fn order_and_size_agree() {
        for order in 0..20u8 {
            let size = size_of_order(Order(order));
            assert_eq!(order_of(size), Order(order));
        }
    }

    #[test]
    fn buddy_is_symmetric() {
        assert_eq!(buddy_of(0, Order(7)), 128);
        assert_eq!(buddy_of(128, Order(7)), 0);
        assert_eq!(buddy_of(128, Order(6)), 192);
        assert_eq!(buddy_of(256, Order(8)), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// The doubling loop the bit trick must agree with.
        fn doubling(n: usize) -> usize {
            let mut power = 1usize;
            while power < n {
                power *= 2;
            }
            power
        }

        proptest! {
            #[test]
            fn normalize_matches_doubling(n in 0usize..(1 << 40)) {
                prop_assert_eq!(normalize(n), Some(doubling(n)));
            }

            #[test]
            fn normalize_is_smallest_power_of_two(n in 1usize..(1 << 40)) {
                let p = normalize(n).unwrap();
                prop_assert!(p.is_power_of_two());
                prop_assert!(p >= n);
                prop_assert!(p / 2 < n);
            }

            #[test]
            fn buddy_of_buddy_is_self(order in 0u8..30, index in 0usize..1024) {
                let offset = index << order;
                let buddy = buddy_of(offset, Order(order));
                prop_assert_eq!(buddy_of(buddy, Order(order)), offset);
                prop_assert_eq!(offset.min(buddy) % (size_of_order(Order(order)) * 2), 0);
            }
        }
    }
}
