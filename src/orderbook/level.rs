//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` is the time-priority queue for one price. Orders form a
//! doubly-linked list through their slab nodes:
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any member can be unlinked in O(1) by slab key; the rest keep their order
//!
//! The level also keeps `volume`, the sum of its members' remaining sizes,
//! updated on every add, fill and removal.

use std::fmt;

use slab::Slab;

use crate::error::{BookError, BookResult};
use crate::orderbook::OrderNode;
use crate::types::price::from_fixed_trimmed;

/// All resting orders at a single price.
///
/// The order data lives in the book's slab; this struct only holds the queue
/// metadata and the aggregate volume.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point)
    pub price: u64,

    /// Own key in the side's level slab; members point back to it
    handle: usize,

    /// Sum of members' remaining sizes
    volume: u64,

    head: Option<usize>,
    tail: Option<usize>,
    order_count: usize,
}

impl PriceLevel {
    /// Create an empty level at `price` stored under `handle`
    pub fn new(price: u64, handle: usize) -> Self {
        Self {
            price,
            handle,
            volume: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn handle(&self) -> usize {
        self.handle
    }

    #[inline]
    pub fn volume(&self) -> u64 {
        self.volume
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(
            self.order_count == 0,
            self.volume == 0,
            "level {} volume/queue disagree",
            self.price
        );
        self.order_count == 0
    }

    /// Oldest order's slab key, the next one to match
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Append an order to the tail of the queue
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn add_order(&mut self, key: usize, orders: &mut Slab<OrderNode>) {
        let node = orders.get_mut(key).expect("Invalid slab key");
        debug_assert!(!node.is_linked(), "order {} already rests", node.order_id());

        let quantity = node.remaining();
        node.prev = self.tail;
        node.next = None;
        node.level = Some(self.handle);

        match self.tail {
            Some(tail_key) => {
                orders.get_mut(tail_key).expect("Invalid tail key").next = Some(key);
            }
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.volume += quantity;
    }

    /// Unlink an order from the queue by slab key
    ///
    /// Returns the removed order's remaining size. Fails with `NotFound` if
    /// the order is not a member of this level.
    pub fn remove_order(&mut self, key: usize, orders: &mut Slab<OrderNode>) -> BookResult<u64> {
        let node = orders
            .get(key)
            .ok_or_else(|| BookError::invariant(format!("no order stored at slot {key}")))?;
        if node.level != Some(self.handle) {
            return Err(BookError::NotFound(node.order_id()));
        }

        let quantity = node.remaining();
        let (prev_key, next_key) = (node.prev, node.next);

        match prev_key {
            Some(prev) => orders.get_mut(prev).expect("Invalid prev key").next = next_key,
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => orders.get_mut(next).expect("Invalid next key").prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = orders.get_mut(key).expect("Invalid slab key");
        node.prev = None;
        node.next = None;
        node.level = None;

        self.order_count -= 1;
        self.volume -= quantity;

        Ok(quantity)
    }

    /// Fill up to `quantity` of a member order
    ///
    /// Reduces the order's remaining size and the level volume by the same
    /// amount, which is returned.
    pub fn fill(&mut self, key: usize, quantity: u64, orders: &mut Slab<OrderNode>) -> u64 {
        let node = orders.get_mut(key).expect("Invalid slab key");
        debug_assert_eq!(node.level, Some(self.handle), "fill on a non-member order");

        let filled = node.order.fill(quantity);
        self.volume -= filled;
        filled
    }

    /// Walk the queue oldest-first
    pub fn iter<'a>(&self, orders: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            orders,
            cursor: self.head,
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PriceLevel{{price: {} | volume: {} | orders: {}}}",
            from_fixed_trimmed(self.price),
            from_fixed_trimmed(self.volume),
            self.order_count
        )
    }
}

/// FIFO iterator over a level's members, yielding `(slab key, node)`.
pub struct LevelIter<'a> {
    orders: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = (usize, &'a OrderNode);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.orders.get(key)?;
        self.cursor = node.next;
        Some((key, node))
    }
}
