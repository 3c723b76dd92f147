//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with:
//!
//! - `prev` / `next`: slab keys of its neighbours in the level queue
//! - `level`: slab key of the [`PriceLevel`](crate::orderbook::PriceLevel)
//!   holding it, in its side's level slab
//!
//! All three are plain `usize` handles, never owning references. The level
//! handle makes membership checks and removal O(1) without walking the queue.
//!
//! ## Linked List
//!
//! ```text
//! head (oldest) <-> ... <-> tail (newest)
//! ```

use crate::types::{Order, OrderId, Side};

/// Order node stored in the book's order slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    pub order: Order,

    /// Newer neighbour; None at the tail
    pub next: Option<usize>,

    /// Older neighbour; None at the head
    pub prev: Option<usize>,

    /// Handle of the level holding this order; None while unlinked
    pub level: Option<usize>,
}

impl OrderNode {
    /// Create a node that is not yet part of any level
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
            level: None,
        }
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.level.is_some()
    }

    #[inline]
    pub fn order_id(&self) -> OrderId {
        self.order.id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.order.side()
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }
}
