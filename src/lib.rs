//! # limit-book
//!
//! Single-instrument limit order book with price-time priority matching.
//!
//! ## Architecture
//!
//! - **Types**: `Order`, `Side`, `Match` and fixed-point price helpers
//! - **OrderBook**: slab-backed levels, best-first sides, id index
//! - **Engine**: the crossing algorithm behind `OrderBook::submit`
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same call sequence yields the same matches and
//!    the same state root
//! 2. **No Floating Point**: prices and sizes are u64 scaled by 10^8
//! 3. **Sequential Core**: `&mut self` mutations, no locks, no I/O
//! 4. **Checked Invariants**: volumes, ordering and indexes are verified
//!    after every mutation in debug builds
//!
//! ## Example
//!
//! ```
//! use limit_book::{OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//! book.submit(Side::Bid, 100, 5).unwrap();
//! book.submit(Side::Bid, 100, 3).unwrap();
//!
//! let result = book.submit(Side::Ask, 100, 6).unwrap();
//! let fills: Vec<u64> = result.matches.iter().map(|m| m.quantity).collect();
//! assert_eq!(fills, vec![5, 1]);
//! assert_eq!(book.volume_at(Side::Bid, 100), 2);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

pub mod config;
pub mod error;

/// Core data types: Order, Side, Match
pub mod types;

/// Order book: levels, sides, snapshots
pub mod orderbook;

/// Matching engine: price-time crossing
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{BookConfig, ConfigError};
pub use error::{BookError, BookResult};
pub use orderbook::{BookSnapshot, LevelSummary, OrderBook, PriceLevel, SubmitResult};
pub use types::{Match, Order, OrderId, Side};
