//! Price-time priority crossing.
//!
//! [`cross`] walks the opposite side of the book best level first, filling
//! the incoming order against each level's oldest order until the incoming
//! order is done or the best remaining level no longer crosses:
//!
//! ```text
//! asks: 100 [A:4]  102 [B:6]
//! incoming bid 101 x 10
//!   -> fill 4 vs A @100, level 100 removed
//!   -> 102 does not cross 101, stop with 6 remaining
//! ```
//!
//! Fully filled resting orders leave their level, the id index and the slab
//! in the same step, and an emptied level leaves its side, so the next
//! iteration always sees a clean best level.

use std::collections::HashMap;

use slab::Slab;
use tracing::trace;

use crate::orderbook::side::{BookSide, PriceKey};
use crate::orderbook::OrderNode;
use crate::types::{Match, Order, OrderId};

/// Cross `incoming` against `opposite`, returning the fills in execution order.
///
/// `incoming.remaining` is reduced by the total filled quantity; the caller
/// rests whatever is left. `next_trade_id` is advanced once per match.
pub(crate) fn cross<K: PriceKey>(
    incoming: &mut Order,
    opposite: &mut BookSide<K>,
    orders: &mut Slab<OrderNode>,
    order_index: &mut HashMap<OrderId, usize>,
    next_trade_id: &mut u64,
) -> Vec<Match> {
    debug_assert_eq!(incoming.side(), K::SIDE.opposite());

    let side = incoming.side();
    let mut matches = Vec::new();

    while incoming.remaining > 0 {
        let Some(level) = opposite.best_level() else {
            break;
        };
        if !side.crosses(incoming.price, level.price) {
            break;
        }

        let handle = level.handle();
        let price = level.price;
        let key = level.peek_head().expect("non-empty level without a head order");

        let resting = &orders[key];
        let resting_id = resting.order_id();
        let quantity = incoming.remaining.min(resting.remaining());

        let filled = opposite.fill(handle, key, quantity, orders);
        debug_assert_eq!(filled, quantity);
        incoming.fill(filled);

        let trade_id = *next_trade_id;
        *next_trade_id += 1;
        matches.push(Match::new(trade_id, resting_id, incoming.id, price, filled));

        trace!(
            trade_id,
            resting_order_id = resting_id,
            incoming_order_id = incoming.id,
            price,
            quantity = filled,
            "fill"
        );

        if orders[key].order.is_filled() {
            opposite
                .remove_order(handle, key, orders)
                .expect("head order is a member of its level");
            order_index.remove(&resting_id);
            orders.remove(key);
        }
    }

    matches
}
