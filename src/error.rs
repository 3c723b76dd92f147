//! Error types for order book operations.
//!
//! ## Policy
//!
//! - **InvalidArgument**: rejected before any mutation, the book is unchanged
//! - **NotFound**: unknown or already terminal order id
//! - **Invariant**: reported by [`OrderBook::check_invariants`]; when invariant
//!   verification is enabled the book panics instead of continuing on a
//!   corrupted index
//!
//! [`OrderBook::check_invariants`]: crate::orderbook::OrderBook::check_invariants

use thiserror::Error;

use crate::types::OrderId;

/// Errors returned by the order book.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Non-positive, non-finite or out-of-range price or size
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Order id is unknown, already filled or already cancelled
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Internal structure is inconsistent
    #[error("book invariant violated: {0}")]
    Invariant(String),
}

/// Result type for order book operations
pub type BookResult<T> = Result<T, BookError>;

impl BookError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BookError::InvalidArgument(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        BookError::Invariant(msg.into())
    }
}
