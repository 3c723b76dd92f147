//! Property tests: book invariants hold under arbitrary call sequences.

use proptest::prelude::*;

use limit_book::{BookConfig, BookError, OrderBook, Side};

#[derive(Debug, Clone)]
enum Op {
    Submit { side: Side, price: u64, size: u64 },
    /// Cancel the n-th id handed out so far (modulo)
    Cancel(usize),
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (side_strategy(), 90u64..=110, 1u64..=20)
            .prop_map(|(side, price, size)| Op::Submit { side, price, size }),
        1 => any::<usize>().prop_map(Op::Cancel),
    ]
}

fn book() -> OrderBook {
    OrderBook::with_config(BookConfig::default().with_verify_invariants(false))
}

proptest! {
    #[test]
    fn invariants_hold_after_every_call(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let mut book = book();
        let mut ids = Vec::new();

        for op in ops {
            match op {
                Op::Submit { side, price, size } => {
                    let result = book.submit(side, price, size).unwrap();
                    ids.push(result.order_id);

                    // Conservation
                    prop_assert_eq!(result.filled() + result.remaining, size);

                    // Nothing rests on both sides at any price
                    for p in book.bids().prices() {
                        prop_assert!(book.asks().level_at(p).is_none());
                    }
                }
                Op::Cancel(n) if !ids.is_empty() => {
                    let id = ids[n % ids.len()];
                    let was_resting = book.contains_order(id);
                    let outcome = book.cancel(id);
                    prop_assert_eq!(outcome.is_ok(), was_resting);
                    prop_assert_eq!(book.cancel(id), Err(BookError::NotFound(id)));
                }
                Op::Cancel(_) => {}
            }

            prop_assert!(book.check_invariants().is_ok(), "{:?}", book.check_invariants());

            // Aggregate volume equals the sum of member remainings
            let levels = book
                .bids()
                .levels()
                .map(|level| (Side::Bid, level))
                .chain(book.asks().levels().map(|level| (Side::Ask, level)));
            for (side, level) in levels {
                let sum: u64 = book
                    .resting_orders()
                    .filter(|o| o.side() == side && o.price == level.price)
                    .map(|o| o.remaining)
                    .sum();
                prop_assert_eq!(sum, level.volume());
                prop_assert_eq!(book.volume_at(side, level.price), level.volume());
            }

            let bids: Vec<u64> = book.bids().prices().collect();
            prop_assert!(bids.windows(2).all(|w| w[0] > w[1]));
            let asks: Vec<u64> = book.asks().prices().collect();
            prop_assert!(asks.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn earlier_order_at_best_price_fills_first(
        sizes in prop::collection::vec(1u64..=10, 2..8),
        take in 1u64..=80,
    ) {
        let mut book = book();
        let ids: Vec<u64> = sizes
            .iter()
            .map(|&size| book.submit(Side::Ask, 100, size).unwrap().order_id)
            .collect();

        let result = book.submit(Side::Bid, 100, take).unwrap();

        // Fills follow submission order exactly, each one exhausting its
        // order before moving on
        let mut left = take;
        for (m, (&id, &size)) in result.matches.iter().zip(ids.iter().zip(&sizes)) {
            prop_assert_eq!(m.resting_order_id, id);
            prop_assert_eq!(m.quantity, size.min(left));
            left -= m.quantity;
        }
        prop_assert_eq!(result.remaining, left);
    }

    #[test]
    fn large_sizes_on_one_level_never_wrap(
        sizes in prop::collection::vec(1u64..=u64::MAX, 1..6),
        side in side_strategy(),
    ) {
        let mut book = book();
        let mut expected: u64 = 0;

        for size in sizes {
            let before = book.order_count();
            match book.submit(side, 100, size) {
                Ok(result) => {
                    prop_assert_eq!(result.remaining, size);
                    expected = expected.checked_add(size).unwrap();
                }
                Err(BookError::InvalidArgument(_)) => {
                    // Rejected only when the level total would overflow
                    prop_assert!(expected.checked_add(size).is_none());
                    prop_assert_eq!(book.order_count(), before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
            prop_assert_eq!(book.volume_at(side, 100), expected);
            prop_assert!(book.check_invariants().is_ok());
        }
    }

    #[test]
    fn same_calls_same_outcome(ops in prop::collection::vec(op_strategy(), 1..100)) {
        let run = |ops: &[Op]| {
            let mut book = book();
            let mut ids = Vec::new();
            let mut trades = Vec::new();
            for op in ops {
                match *op {
                    Op::Submit { side, price, size } => {
                        let result = book.submit(side, price, size).unwrap();
                        ids.push(result.order_id);
                        trades.extend(result.matches);
                    }
                    Op::Cancel(n) if !ids.is_empty() => {
                        let _ = book.cancel(ids[n % ids.len()]);
                    }
                    Op::Cancel(_) => {}
                }
            }
            (trades, book.state_root())
        };

        prop_assert_eq!(run(&ops), run(&ops));
    }
}
