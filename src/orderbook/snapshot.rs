//! Point-in-time views of the book.
//!
//! A [`BookSnapshot`] is an owned copy of the top of both sides plus the
//! state root of the whole book. It shares nothing with the live book, so it
//! can be handed to other threads while the single writer keeps mutating.
//!
//! ## State Root
//!
//! The state root is the SHA-256 of the SSZ encoding of every resting order
//! in price-time priority (bids best-first, then asks best-first, each level
//! oldest-first). Two books that saw the same sequence of calls have the same
//! root, which makes replays cheap to compare.

use sha2::{Digest, Sha256};

use crate::orderbook::side::{BookSide, PriceKey};
use crate::orderbook::{OrderBook, PriceLevel};
use crate::types::price::from_fixed_trimmed;

/// Aggregate view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub price: u64,
    pub volume: u64,
    pub order_count: usize,
}

impl From<&PriceLevel> for LevelSummary {
    fn from(level: &PriceLevel) -> Self {
        Self {
            price: level.price,
            volume: level.volume(),
            order_count: level.len(),
        }
    }
}

/// Owned copy of the book at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSnapshot {
    /// Bid levels, best (highest) first
    pub bids: Vec<LevelSummary>,

    /// Ask levels, best (lowest) first
    pub asks: Vec<LevelSummary>,

    /// Resting orders on both sides
    pub order_count: usize,

    /// Hash of the full resting book
    pub state_root: [u8; 32],
}

impl BookSnapshot {
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|level| level.price)
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|level| level.price)
    }

    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Human-readable ladder, asks on top
    pub fn render(&self) -> String {
        let mut out = String::new();
        for level in self.asks.iter().rev() {
            out.push_str(&format!(
                "  ask {:>14} | {:>14} ({})\n",
                from_fixed_trimmed(level.price),
                from_fixed_trimmed(level.volume),
                level.order_count
            ));
        }
        out.push_str("  ----\n");
        for level in &self.bids {
            out.push_str(&format!(
                "  bid {:>14} | {:>14} ({})\n",
                from_fixed_trimmed(level.price),
                from_fixed_trimmed(level.volume),
                level.order_count
            ));
        }
        out
    }
}

fn top_levels<K: PriceKey>(side: &BookSide<K>, depth: usize) -> Vec<LevelSummary> {
    side.levels().take(depth).map(LevelSummary::from).collect()
}

impl OrderBook {
    /// Copy the best `depth` levels of each side.
    ///
    /// ```
    /// use limit_book::{OrderBook, Side};
    ///
    /// let mut book = OrderBook::new();
    /// book.submit(Side::Bid, 99, 5).unwrap();
    /// book.submit(Side::Bid, 98, 5).unwrap();
    ///
    /// let snapshot = book.snapshot(1);
    /// assert_eq!(snapshot.bids.len(), 1);
    /// assert_eq!(snapshot.best_bid(), Some(99));
    /// ```
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            bids: top_levels(self.bids(), depth),
            asks: top_levels(self.asks(), depth),
            order_count: self.order_count(),
            state_root: self.state_root(),
        }
    }

    /// SHA-256 over the SSZ encoding of all resting orders in priority order
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for order in self.resting_orders() {
            let bytes = ssz_rs::serialize(order).expect("fixed-size order always serializes");
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}
