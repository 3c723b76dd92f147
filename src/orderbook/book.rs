//! Single-instrument limit order book.
//!
//! ## Architecture
//!
//! - **Slab<OrderNode>**: storage for every resting order, keyed by slot
//! - **BidSide / AskSide**: price levels ordered best-first
//! - **HashMap<OrderId, slot>**: id index for O(1) cancel
//! - **Counters**: order id, submission sequence and trade id, owned by the
//!   book and reset only when a new book is built
//!
//! ## Execution Model
//!
//! The book is a sequential state machine. `submit` and `cancel` take
//! `&mut self` and run to completion without I/O; queries take `&self`.
//! Callers that receive requests concurrently serialize them into one writer
//! and hand readers a [`BookSnapshot`](crate::orderbook::BookSnapshot).
//!
//! ## Example
//!
//! ```
//! use limit_book::{OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//!
//! let bid = book.submit(Side::Bid, 100, 10).unwrap();
//! assert!(bid.matches.is_empty());
//! assert_eq!(book.best_bid(), Some(100));
//!
//! let ask = book.submit(Side::Ask, 100, 4).unwrap();
//! assert_eq!(ask.matches[0].quantity, 4);
//! assert_eq!(book.volume_at(Side::Bid, 100), 6);
//!
//! book.cancel(bid.order_id).unwrap();
//! assert!(book.is_empty());
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use slab::Slab;
use tracing::{debug, warn};

use crate::config::BookConfig;
use crate::engine::matcher::cross;
use crate::error::{BookError, BookResult};
use crate::orderbook::side::{AskSide, BidSide};
use crate::orderbook::OrderNode;
use crate::types::price::{checked_price, checked_size, decimal_amount, f64_amount};
use crate::types::{Match, Order, OrderId, Side};

/// Outcome of one [`OrderBook::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    /// Id assigned to the incoming order; cancels its resting remainder
    pub order_id: OrderId,

    /// Fills in execution order
    pub matches: Vec<Match>,

    /// Size left after matching, now resting on the book (0 if fully filled)
    pub remaining: u64,
}

impl SubmitResult {
    pub fn is_fully_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Total quantity executed across all matches
    pub fn filled(&self) -> u64 {
        self.matches.iter().map(|m| m.quantity).sum()
    }
}

/// Limit order book for one instrument.
#[derive(Debug, Clone)]
pub struct OrderBook {
    config: BookConfig,

    /// Resting order storage
    orders: Slab<OrderNode>,

    bids: BidSide,
    asks: AskSide,

    /// Order id to slab key, for every resting order
    order_index: HashMap<OrderId, usize>,

    next_order_id: OrderId,
    next_sequence: u64,
    next_trade_id: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book with the default configuration
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create a book with `order_capacity` pre-allocated order slots
    ///
    /// ```
    /// use limit_book::OrderBook;
    ///
    /// let book = OrderBook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self::with_config(BookConfig::default().with_order_capacity(order_capacity))
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self {
            orders: Slab::with_capacity(config.order_capacity),
            bids: BidSide::new(),
            asks: AskSide::new(),
            order_index: HashMap::with_capacity(config.order_capacity),
            next_order_id: 1,
            next_sequence: 1,
            next_trade_id: 1,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Number of resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.level_count()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.level_count()
    }

    #[inline]
    pub fn bids(&self) -> &BidSide {
        &self.bids
    }

    #[inline]
    pub fn asks(&self) -> &AskSide {
        &self.asks
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Submit a limit order with fixed-point `price` and `size`.
    ///
    /// Crosses the opposite side under price-time priority, then rests any
    /// remainder at `price`. Invalid arguments are rejected before anything
    /// changes.
    pub fn submit(&mut self, side: Side, price: u64, size: u64) -> BookResult<SubmitResult> {
        let validated = checked_price(price)
            .and_then(|_| checked_size(size))
            .and_then(|_| self.check_level_capacity(side, price, size));
        if let Err(err) = validated {
            warn!(%side, price, size, error = %err, "rejected order");
            return Err(err);
        }

        let order_id = self.next_order_id;
        self.next_order_id += 1;
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let mut incoming = Order::new(order_id, side, price, size, sequence);
        debug!(order_id, %side, price, size, "submit");

        let matches = match side {
            Side::Bid => cross(
                &mut incoming,
                &mut self.asks,
                &mut self.orders,
                &mut self.order_index,
                &mut self.next_trade_id,
            ),
            Side::Ask => cross(
                &mut incoming,
                &mut self.bids,
                &mut self.orders,
                &mut self.order_index,
                &mut self.next_trade_id,
            ),
        };

        let remaining = incoming.remaining;
        if remaining > 0 {
            self.rest(incoming);
        }

        debug!(order_id, matches = matches.len(), remaining, "submitted");
        self.verify();

        Ok(SubmitResult {
            order_id,
            matches,
            remaining,
        })
    }

    /// Submit with decimal price and size, converted to fixed-point.
    ///
    /// ```
    /// use limit_book::{OrderBook, Side};
    /// use rust_decimal::Decimal;
    ///
    /// let mut book = OrderBook::new();
    /// book.submit_decimal(Side::Bid, Decimal::new(1005, 1), Decimal::ONE).unwrap();
    /// assert_eq!(book.best_bid(), Some(10_050_000_000));
    /// ```
    pub fn submit_decimal(&mut self, side: Side, price: Decimal, size: Decimal) -> BookResult<SubmitResult> {
        let (price, size) = match decimal_amount(price, "price").and_then(|p| Ok((p, decimal_amount(size, "size")?))) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%side, error = %err, "rejected order");
                return Err(err);
            }
        };
        self.submit(side, price, size)
    }

    /// Submit with float price and size; NaN and infinities are rejected.
    pub fn submit_f64(&mut self, side: Side, price: f64, size: f64) -> BookResult<SubmitResult> {
        let (price, size) = match f64_amount(price, "price").and_then(|p| Ok((p, f64_amount(size, "size")?))) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%side, error = %err, "rejected order");
                return Err(err);
            }
        };
        self.submit(side, price, size)
    }

    /// Reject a size that would overflow the volume of its own level.
    ///
    /// An existing level at `price` means the opposite side cannot cross
    /// `price`, so the whole `size` would rest there.
    fn check_level_capacity(&self, side: Side, price: u64, size: u64) -> BookResult<()> {
        let volume = self.volume_at(side, price);
        if volume.checked_add(size).is_none() {
            return Err(BookError::invalid(format!(
                "size {size} overflows the {side} volume {volume} at price {price}"
            )));
        }
        Ok(())
    }

    fn rest(&mut self, order: Order) {
        let order_id = order.id;
        let price = order.price;
        let side = order.side();

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(order_id, key);

        match side {
            Side::Bid => self.bids.add_order(price, key, &mut self.orders),
            Side::Ask => self.asks.add_order(price, key, &mut self.orders),
        }
        debug!(order_id, %side, price, "rested");
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Withdraw a resting order, removing all of its remaining size.
    ///
    /// Returns the order as it stood at cancellation. Unknown, filled and
    /// already cancelled ids fail with `NotFound`.
    pub fn cancel(&mut self, order_id: OrderId) -> BookResult<Order> {
        let Some(&key) = self.order_index.get(&order_id) else {
            warn!(order_id, "cancel of unknown order");
            return Err(BookError::NotFound(order_id));
        };

        let node = &self.orders[key];
        let side = node.side();
        let handle = node.level.expect("indexed order is not linked to a level");

        let removed = match side {
            Side::Bid => self.bids.remove_order(handle, key, &mut self.orders),
            Side::Ask => self.asks.remove_order(handle, key, &mut self.orders),
        };
        removed.expect("indexed order is a member of its level");

        self.order_index.remove(&order_id);
        let order = self.orders.remove(key).order;

        debug!(order_id, %side, price = order.price, remaining = order.remaining, "cancelled");
        self.verify();

        Ok(order)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Highest resting bid price
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    /// Lowest resting ask price
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// best_ask - best_bid, or None if either side is empty
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Aggregate resting size at `price` on `side` (0 if no level)
    pub fn volume_at(&self, side: Side, price: u64) -> u64 {
        match side {
            Side::Bid => self.bids.volume_at(price),
            Side::Ask => self.asks.volume_at(price),
        }
    }

    /// A resting order by id
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let &key = self.order_index.get(&order_id)?;
        self.orders.get(key).map(|node| &node.order)
    }

    #[inline]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Id the next submission will receive
    #[inline]
    pub fn peek_next_order_id(&self) -> OrderId {
        self.next_order_id
    }

    /// Resting orders in price-time priority: bids best-first, then asks
    /// best-first, each level oldest-first.
    pub fn resting_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        let bids = self.bids.levels().flat_map(move |level| level.iter(&self.orders));
        let asks = self.asks.levels().flat_map(move |level| level.iter(&self.orders));
        bids.chain(asks).map(|(_, node)| &node.order)
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Check every structural invariant of the book.
    ///
    /// - each side's ordered map and price index hold the same levels, in
    ///   side order, with volumes equal to their members' remaining sizes
    /// - the id index covers exactly the resting orders
    /// - the book is not crossed, so no price rests on both sides
    pub fn check_invariants(&self) -> BookResult<()> {
        self.bids.check(&self.orders)?;
        self.asks.check(&self.orders)?;

        let resting = self.bids.order_count() + self.asks.order_count();
        if resting != self.orders.len() || resting != self.order_index.len() {
            return Err(BookError::invariant(format!(
                "{resting} orders on the sides, {} stored, {} indexed",
                self.orders.len(),
                self.order_index.len()
            )));
        }

        for (&order_id, &key) in &self.order_index {
            match self.orders.get(key) {
                Some(node) if node.order_id() == order_id && node.is_linked() => {}
                _ => {
                    return Err(BookError::invariant(format!("order {order_id} index entry is stale")));
                }
            }
        }

        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            if bid >= ask {
                return Err(BookError::invariant(format!("book crossed: bid {bid} >= ask {ask}")));
            }
        }
        Ok(())
    }

    fn verify(&self) {
        if self.config.verify_invariants {
            if let Err(err) = self.check_invariants() {
                panic!("{err}");
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
