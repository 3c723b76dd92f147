//! One side of the book: price levels ordered best-first.
//!
//! ## Structure
//!
//! - **Slab<PriceLevel>**: level storage; the slab key is the level handle
//!   that resting orders point back to
//! - **BTreeMap<K, handle>**: levels ordered by a side-specific key, so the
//!   first entry is always the best price
//! - **HashMap<price, handle>**: direct lookup for level creation and
//!   `volume_at`
//!
//! The ordered map and the price index always hold the same set of levels,
//! and a level is dropped from both in the same call that unlinks its last
//! order. [`BookSide::check`] verifies all of this against the order slab.
//!
//! ## Key Ordering
//!
//! | Side | Key | Iteration order |
//! |------|-----|-----------------|
//! | Bid | `BidKey(Reverse(price))` | descending price |
//! | Ask | `AskKey(price)` | ascending price |

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use slab::Slab;

use crate::error::{BookError, BookResult};
use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::Side;

/// Ordering key for a book side. Smaller keys are better prices.
pub trait PriceKey: Ord + Copy + Debug {
    const SIDE: Side;

    fn from_price(price: u64) -> Self;

    fn price(self) -> u64;
}

/// Bid ordering: highest price first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BidKey(pub Reverse<u64>);

/// Ask ordering: lowest price first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AskKey(pub u64);

impl PriceKey for BidKey {
    const SIDE: Side = Side::Bid;

    #[inline]
    fn from_price(price: u64) -> Self {
        BidKey(Reverse(price))
    }

    #[inline]
    fn price(self) -> u64 {
        (self.0).0
    }
}

impl PriceKey for AskKey {
    const SIDE: Side = Side::Ask;

    #[inline]
    fn from_price(price: u64) -> Self {
        AskKey(price)
    }

    #[inline]
    fn price(self) -> u64 {
        self.0
    }
}

/// Bid side of the book
pub type BidSide = BookSide<BidKey>;

/// Ask side of the book
pub type AskSide = BookSide<AskKey>;

/// Price-ordered collection of levels for one side.
#[derive(Debug, Clone)]
pub struct BookSide<K: PriceKey> {
    levels: Slab<PriceLevel>,
    ordered: BTreeMap<K, usize>,
    index: HashMap<u64, usize>,
    order_count: usize,
}

impl<K: PriceKey> Default for BookSide<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PriceKey> BookSide<K> {
    pub fn new() -> Self {
        Self {
            levels: Slab::new(),
            ordered: BTreeMap::new(),
            index: HashMap::new(),
            order_count: 0,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        K::SIDE
    }

    /// Number of resting orders on this side
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Number of price levels on this side
    #[inline]
    pub fn level_count(&self) -> usize {
        self.ordered.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Best price level, or None if the side is empty
    #[inline]
    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.ordered
            .first_key_value()
            .map(|(_, &handle)| &self.levels[handle])
    }

    #[inline]
    pub fn best_price(&self) -> Option<u64> {
        self.ordered.first_key_value().map(|(key, _)| key.price())
    }

    /// Level at an exact price
    #[inline]
    pub fn level_at(&self, price: u64) -> Option<&PriceLevel> {
        self.index.get(&price).map(|&handle| &self.levels[handle])
    }

    /// Level by handle
    #[inline]
    pub fn level(&self, handle: usize) -> Option<&PriceLevel> {
        self.levels.get(handle)
    }

    /// Aggregate remaining size at `price` (0 if no level)
    #[inline]
    pub fn volume_at(&self, price: u64) -> u64 {
        self.level_at(price).map_or(0, PriceLevel::volume)
    }

    /// Levels best-first
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.ordered.values().map(move |&handle| &self.levels[handle])
    }

    /// Level prices best-first
    pub fn prices(&self) -> impl Iterator<Item = u64> + '_ {
        self.ordered.keys().map(|key| key.price())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Level at `price`, created and ranked on first use
    pub fn get_or_create_level(&mut self, price: u64) -> &mut PriceLevel {
        let handle = match self.index.get(&price) {
            Some(&handle) => handle,
            None => {
                let entry = self.levels.vacant_entry();
                let handle = entry.key();
                entry.insert(PriceLevel::new(price, handle));
                self.ordered.insert(K::from_price(price), handle);
                self.index.insert(price, handle);
                handle
            }
        };
        &mut self.levels[handle]
    }

    /// Drop the level at `price` from the index and the ordered map
    ///
    /// Only empty levels may be removed.
    pub fn remove_level(&mut self, price: u64) -> Option<PriceLevel> {
        let handle = self.index.remove(&price)?;
        self.ordered.remove(&K::from_price(price));
        let level = self.levels.remove(handle);
        debug_assert!(level.is_empty(), "removed level {price} still holds orders");
        Some(level)
    }

    /// Rest an order node at `price`
    pub fn add_order(&mut self, price: u64, key: usize, orders: &mut Slab<OrderNode>) {
        self.get_or_create_level(price).add_order(key, orders);
        self.order_count += 1;
    }

    /// Fill a member of the level `handle`, keeping the level volume in step
    pub fn fill(&mut self, handle: usize, key: usize, quantity: u64, orders: &mut Slab<OrderNode>) -> u64 {
        self.levels
            .get_mut(handle)
            .expect("Invalid level handle")
            .fill(key, quantity, orders)
    }

    /// Unlink an order from level `handle`, dropping the level if it empties
    ///
    /// Returns the order's remaining size at removal.
    pub fn remove_order(&mut self, handle: usize, key: usize, orders: &mut Slab<OrderNode>) -> BookResult<u64> {
        let level = self
            .levels
            .get_mut(handle)
            .ok_or_else(|| BookError::invariant(format!("no {} level under handle {handle}", K::SIDE)))?;
        let quantity = level.remove_order(key, orders)?;
        self.order_count -= 1;

        if level.is_empty() {
            let price = level.price;
            self.remove_level(price);
        }
        Ok(quantity)
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Verify the ordered map, the price index and every level queue
    pub fn check(&self, orders: &Slab<OrderNode>) -> BookResult<()> {
        let side = K::SIDE;

        if self.ordered.len() != self.index.len() || self.ordered.len() != self.levels.len() {
            return Err(BookError::invariant(format!(
                "{side} ordered/index/storage sizes differ: {}/{}/{}",
                self.ordered.len(),
                self.index.len(),
                self.levels.len()
            )));
        }

        let mut previous: Option<u64> = None;
        let mut total_orders = 0;

        for (key, &handle) in &self.ordered {
            let price = key.price();
            let level = self
                .levels
                .get(handle)
                .ok_or_else(|| BookError::invariant(format!("{side} level {price} has no storage")))?;

            if level.price != price || level.handle() != handle {
                return Err(BookError::invariant(format!("{side} level {price} stored under wrong key")));
            }
            if self.index.get(&price) != Some(&handle) {
                return Err(BookError::invariant(format!("{side} level {price} missing from price index")));
            }
            if let Some(prev) = previous {
                let better = match side {
                    Side::Bid => prev > price,
                    Side::Ask => prev < price,
                };
                if !better {
                    return Err(BookError::invariant(format!("{side} levels out of order at {price}")));
                }
            }
            previous = Some(price);

            if level.len() == 0 || level.volume() == 0 {
                return Err(BookError::invariant(format!("empty {side} level left at {price}")));
            }

            let mut volume = 0u64;
            let mut count = 0usize;
            let mut last_sequence: Option<u64> = None;
            let mut prev_key: Option<usize> = None;

            for (slot, node) in level.iter(orders) {
                if node.level != Some(handle) || node.prev != prev_key {
                    return Err(BookError::invariant(format!(
                        "order {} has a stale link in {side} level {price}",
                        node.order_id()
                    )));
                }
                if Side::from_u8(node.order.side_raw) != Some(side) || node.price() != price {
                    return Err(BookError::invariant(format!(
                        "order {} does not belong to {side} level {price}",
                        node.order_id()
                    )));
                }
                if node.remaining() == 0 {
                    return Err(BookError::invariant(format!("filled order {} still rests", node.order_id())));
                }
                if last_sequence.is_some_and(|seq| seq >= node.order.sequence) {
                    return Err(BookError::invariant(format!("{side} level {price} is not in time priority")));
                }
                last_sequence = Some(node.order.sequence);
                prev_key = Some(slot);
                volume = volume.checked_add(node.remaining()).ok_or_else(|| {
                    BookError::invariant(format!("{side} level {price} volume overflows u64"))
                })?;
                count += 1;
            }

            if volume != level.volume() || count != level.len() {
                return Err(BookError::invariant(format!(
                    "{side} level {price}: volume {} / count {} but members sum to {volume} / {count}",
                    level.volume(),
                    level.len()
                )));
            }
            total_orders += count;
        }

        if total_orders != self.order_count {
            return Err(BookError::invariant(format!(
                "{side} order count {} but levels hold {total_orders}",
                self.order_count
            )));
        }
        Ok(())
    }
}
