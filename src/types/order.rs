//! Order type for the limit order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the resting book can be
//! hashed deterministically (see `OrderBook::state_root`). Encoding rules:
//! - Basic types (u64, u8): little-endian encoding
//! - Fixed-size containers: concatenated fields
//!
//! ## Fixed-Point Representation
//!
//! Prices and sizes are u64 scaled by 10^8 (see [`crate::types::price::SCALE`]).

use std::fmt;

use ssz_rs::prelude::*;

use crate::types::price::from_fixed_trimmed;

/// Book-assigned order identifier
pub type OrderId = u64;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Bid or Ask
///
/// Represented as u8 in the SSZ layout:
/// - Bid = 0
/// - Ask = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy interest - crosses against asks
    #[default]
    Bid,
    /// Sell interest - crosses against bids
    Ask,
}

impl Side {
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Ask),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Whether an order on this side at `price` can trade against a resting
    /// order on the opposite side at `resting_price`.
    ///
    /// ```
    /// use limit_book::types::Side;
    ///
    /// assert!(Side::Bid.crosses(101, 100));
    /// assert!(Side::Bid.crosses(100, 100));
    /// assert!(!Side::Ask.crosses(101, 100));
    /// ```
    #[inline]
    pub fn crosses(self, price: u64, resting_price: u64) -> bool {
        match self {
            Side::Bid => price >= resting_price,
            Side::Ask => price <= resting_price,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order.
///
/// `id`, side, price, `quantity` and `sequence` never change after
/// submission; `remaining` only decreases.
///
/// ## SSZ Layout
///
/// Fixed-size container of 41 bytes: 8+1+8+8+8+8.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Book-assigned identifier
    pub id: u64,

    /// Side as u8 (0=Bid, 1=Ask)
    pub side_raw: u8,

    /// Limit price in fixed-point
    pub price: u64,

    /// Original size in fixed-point
    pub quantity: u64,

    /// Unfilled size
    pub remaining: u64,

    /// Submission sequence number, the time-priority tie-break
    pub sequence: u64,
}

impl Order {
    /// Create a new limit order
    ///
    /// ```
    /// use limit_book::types::{Order, Side};
    ///
    /// let order = Order::new(1, Side::Bid, 100, 10, 1);
    /// assert_eq!(order.side(), Side::Bid);
    /// assert_eq!(order.remaining, 10);
    /// ```
    pub fn new(id: OrderId, side: Side, price: u64, quantity: u64, sequence: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
            remaining: quantity,
            sequence,
        }
    }

    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).expect("order side_raw is not a valid side")
    }

    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Fill a portion of this order
    ///
    /// Returns the quantity actually filled, capped at `remaining`.
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.remaining);
        self.remaining -= actual_fill;
        actual_fill
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order{{id: {} | {} | price: {} | remaining: {}/{}}}",
            self.id,
            self.side(),
            from_fixed_trimmed(self.price),
            from_fixed_trimmed(self.remaining),
            from_fixed_trimmed(self.quantity),
        )
    }
}
