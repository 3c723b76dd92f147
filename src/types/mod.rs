//! Core data types for the limit order book.
//!
//! - [`Order`]: a limit order, resting or incoming
//! - [`Side`]: Bid or Ask
//! - [`Match`]: a fill between a resting and an incoming order
//!
//! All prices and sizes are `u64` fixed-point values scaled by 10^8.
//! Example: 50000.12345678 is stored as 5_000_012_345_678u64

mod order;
mod trade;
pub mod price;

pub use order::{Order, OrderId, Side};
pub use trade::Match;
