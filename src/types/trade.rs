//! Match events emitted by the crossing algorithm.
//!
//! One `submit` yields zero or more matches, in the exact order they were
//! generated. That sequence is the only trade-reporting surface of the book;
//! persisting or broadcasting it is the caller's job.

use ssz_rs::prelude::*;

use crate::types::OrderId;

/// A single fill between a resting order and an incoming order.
///
/// The execution price is always the resting order's level price.
///
/// ```
/// use limit_book::types::Match;
///
/// let m = Match::new(1, 10, 11, 100, 5);
/// assert_eq!(m.resting_order_id, 10);
/// assert_eq!(m.quantity, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Match {
    /// Book-local trade id, strictly increasing
    pub id: u64,

    /// The order that was resting in the book
    pub resting_order_id: OrderId,

    /// The order being submitted
    pub incoming_order_id: OrderId,

    /// Execution price in fixed-point
    pub price: u64,

    /// Filled size in fixed-point, always > 0
    pub quantity: u64,
}

impl Match {
    pub fn new(
        id: u64,
        resting_order_id: OrderId,
        incoming_order_id: OrderId,
        price: u64,
        quantity: u64,
    ) -> Self {
        Self {
            id,
            resting_order_id,
            incoming_order_id,
            price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_deterministic_serialization() {
        let m = Match::new(1, 100, 200, 5_000_000_000_000, 50_000_000);

        let bytes1 = ssz_rs::serialize(&m).expect("Failed to serialize");
        let bytes2 = ssz_rs::serialize(&m).expect("Failed to serialize");

        assert_eq!(bytes1, bytes2);
        assert_eq!(bytes1.len(), 40);
    }
}
