//! Per-order free lists.
//!
//! [`FreeLists`] holds, for each order between the minimum block order and
//! the arena order, the set of offsets that start a wholly free block of
//! exactly that order. Sets are ordered so the lowest free offset of an
//! order is always taken first.

use std::collections::BTreeSet;

use carve_core::{size_of_order, Order};
use smallvec::SmallVec;

/// Free block offsets grouped by order.
///
/// A 64-bit arena has at most 64 orders; the inline capacity covers every
/// arena up to 16 MiB with a one-byte minimum block without spilling.
pub struct FreeLists {
    min_order: Order,
    max_order: Order,
    /// `lists[i]` holds free blocks of order `min_order + i`.
    lists: SmallVec<[BTreeSet<usize>; 24]>,
}

impl FreeLists {
    /// Free lists for an arena of order `max_order`, initially holding a
    /// single free block covering the whole arena.
    pub fn new(min_order: Order, max_order: Order) -> Self {
        debug_assert!(min_order <= max_order);
        let count = (max_order.0 - min_order.0) as usize + 1;
        let lists = (0..count).map(|_| BTreeSet::new()).collect();
        let mut free = Self {
            min_order,
            max_order,
            lists,
        };
        free.reset();
        free
    }

    fn slot(&self, order: Order) -> usize {
        debug_assert!(order >= self.min_order && order <= self.max_order);
        (order.0 - self.min_order.0) as usize
    }

    /// Smallest order the lists track.
    pub fn min_order(&self) -> Order {
        self.min_order
    }

    /// Order of the whole arena.
    pub fn max_order(&self) -> Order {
        self.max_order
    }

    /// Record `offset` as the head of a free block of `order`.
    pub fn push(&mut self, order: Order, offset: usize) {
        let slot = self.slot(order);
        let inserted = self.lists[slot].insert(offset);
        debug_assert!(inserted, "offset {offset} already free at order {order}");
    }

    /// Remove `offset` from the list of `order`. Returns whether it was
    /// present.
    pub fn remove(&mut self, order: Order, offset: usize) -> bool {
        let slot = self.slot(order);
        self.lists[slot].remove(&offset)
    }

    /// Take the lowest free offset of exactly `order`.
    pub fn pop_lowest(&mut self, order: Order) -> Option<usize> {
        let slot = self.slot(order);
        self.lists[slot].pop_first()
    }

    /// Whether `offset` heads a free block of exactly `order`.
    pub fn contains(&self, order: Order, offset: usize) -> bool {
        self.lists[self.slot(order)].contains(&offset)
    }

    /// Smallest order at or above `target` with a free block.
    pub fn smallest_available(&self, target: Order) -> Option<Order> {
        let start = self.slot(target);
        self.lists[start..]
            .iter()
            .position(|list| !list.is_empty())
            .map(|i| Order(target.0 + i as u8))
    }

    /// Number of free blocks of `order`.
    pub fn count(&self, order: Order) -> usize {
        self.lists[self.slot(order)].len()
    }

    /// Total free bytes across all orders.
    pub fn free_bytes(&self) -> usize {
        self.orders()
            .map(|order| self.count(order) * size_of_order(order))
            .sum()
    }

    /// Size of the largest free block, or 0 if the arena is full.
    pub fn largest_free(&self) -> usize {
        self.orders()
            .rev()
            .find(|&order| self.count(order) > 0)
            .map_or(0, size_of_order)
    }

    /// Every free block as `(order, offset)`, ascending by order then
    /// offset.
    pub fn iter(&self) -> impl Iterator<Item = (Order, usize)> + '_ {
        self.lists.iter().enumerate().flat_map(move |(i, list)| {
            let order = Order(self.min_order.0 + i as u8);
            list.iter().map(move |&offset| (order, offset))
        })
    }

    /// Orders tracked by these lists, ascending.
    pub fn orders(&self) -> impl DoubleEndedIterator<Item = Order> {
        (self.min_order.0..=self.max_order.0).map(Order)
    }

    /// Drop every free block and restore the single arena-sized block.
    pub fn reset(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
        let top = self.slot(self.max_order);
        self.lists[top].insert(0);
    }
}
