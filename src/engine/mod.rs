//! Matching engine for the limit order book.
//!
//! ## Matching Rules
//!
//! - **Bids** match against asks (lowest price first)
//! - **Asks** match against bids (highest price first)
//! - Within a price, the oldest resting order fills first
//! - Trades execute at the resting order's price
//! - Unfilled quantity rests on the book
//!
//! The engine is driven by [`OrderBook::submit`](crate::orderbook::OrderBook::submit);
//! it has no state of its own.
//!
//! ## Example
//!
//! ```
//! use limit_book::{OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//! book.submit(Side::Ask, 100, 10).unwrap();
//!
//! let result = book.submit(Side::Bid, 100, 10).unwrap();
//! assert!(result.is_fully_filled());
//! assert_eq!(result.matches.len(), 1);
//! ```

pub(crate) mod matcher;
