//! Order book: resting liquidity and the crossing entry point.
//!
//! ## Architecture
//!
//! - **Slab storage**: O(1) order insertion, removal and lookup by slot
//! - **Book sides**: levels ordered best-first in a BTreeMap plus a
//!   price index
//! - **Price-time priority**: FIFO queue at each price level
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus queue links and a handle to its level
//! - [`PriceLevel`]: the FIFO queue and aggregate volume for one price
//! - [`BookSide`]: ordered levels for one side
//! - [`OrderBook`]: both sides, the id index, `submit` and `cancel`
//! - [`BookSnapshot`]: owned point-in-time copy for readers
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Rest order | O(log L) new level, O(1) existing |
//! | Cancel by ID | O(1) + O(log L) if the level empties |
//! | Best bid/ask | O(log L) |
//! | Submit | O(k + m log L) for k fills emptying m levels |

pub mod node;
pub mod level;
pub mod side;
pub mod book;
pub mod snapshot;

pub use book::{OrderBook, SubmitResult};
pub use level::PriceLevel;
pub use node::OrderNode;
pub use side::{AskSide, BidSide, BookSide};
pub use snapshot::{BookSnapshot, LevelSummary};
