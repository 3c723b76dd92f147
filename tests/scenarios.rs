//! End-to-end book scenarios through the public API.

use limit_book::{BookConfig, BookError, Match, OrderBook, Side};

fn book() -> OrderBook {
    OrderBook::with_config(BookConfig::default().with_verify_invariants(true))
}

#[test]
fn empty_book_bid_rests() {
    let mut book = book();

    let result = book.submit(Side::Bid, 100, 10).unwrap();

    assert!(result.matches.is_empty());
    assert_eq!(result.remaining, 10);
    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), None);
    assert_eq!(book.volume_at(Side::Bid, 100), 10);
}

#[test]
fn opposite_order_at_same_price_clears_level() {
    let mut book = book();
    let bid = book.submit(Side::Bid, 100, 10).unwrap();

    let ask = book.submit(Side::Ask, 100, 10).unwrap();

    assert_eq!(ask.matches, vec![Match::new(1, bid.order_id, ask.order_id, 100, 10)]);
    assert_eq!(ask.remaining, 0);
    assert!(book.is_empty());
    assert_eq!(book.volume_at(Side::Bid, 100), 0);
    assert_eq!(book.volume_at(Side::Ask, 100), 0);
    assert!(book.bids().level_at(100).is_none());
    assert!(book.asks().level_at(100).is_none());
}

#[test]
fn same_price_fills_oldest_first() {
    let mut book = book();
    let first = book.submit(Side::Bid, 100, 5).unwrap();
    let second = book.submit(Side::Bid, 100, 3).unwrap();

    let ask = book.submit(Side::Ask, 100, 6).unwrap();

    let fills: Vec<(u64, u64)> = ask
        .matches
        .iter()
        .map(|m| (m.resting_order_id, m.quantity))
        .collect();
    assert_eq!(fills, vec![(first.order_id, 5), (second.order_id, 1)]);
    assert_eq!(ask.remaining, 0);
    assert!(!book.contains_order(first.order_id));
    assert_eq!(book.order(second.order_id).unwrap().remaining, 2);
    assert_eq!(book.volume_at(Side::Bid, 100), 2);
}

#[test]
fn bid_walks_asks_and_stops_at_first_non_crossing_level() {
    let mut book = book();
    let cheap = book.submit(Side::Ask, 100, 4).unwrap();
    book.submit(Side::Ask, 102, 6).unwrap();

    let bid = book.submit(Side::Bid, 101, 10).unwrap();

    assert_eq!(bid.matches.len(), 1);
    assert_eq!(bid.matches[0].resting_order_id, cheap.order_id);
    assert_eq!(bid.matches[0].price, 100);
    assert_eq!(bid.matches[0].quantity, 4);
    assert_eq!(bid.remaining, 6);

    // Remainder rests on the bid side, below the untouched ask
    assert_eq!(book.best_bid(), Some(101));
    assert_eq!(book.volume_at(Side::Bid, 101), 6);
    assert_eq!(book.best_ask(), Some(102));
    assert_eq!(book.volume_at(Side::Ask, 102), 6);
}

#[test]
fn ask_walks_bids_and_stops_at_first_non_crossing_level() {
    let mut book = book();
    let rich = book.submit(Side::Bid, 102, 4).unwrap();
    book.submit(Side::Bid, 100, 6).unwrap();

    let ask = book.submit(Side::Ask, 101, 10).unwrap();

    assert_eq!(ask.matches.len(), 1);
    assert_eq!(ask.matches[0].resting_order_id, rich.order_id);
    assert_eq!(ask.matches[0].price, 102);
    assert_eq!(ask.remaining, 6);
    assert_eq!(book.best_ask(), Some(101));
    assert_eq!(book.best_bid(), Some(100));
}

#[test]
fn crossing_walks_several_levels_in_price_order() {
    let mut book = book();
    book.submit(Side::Ask, 103, 1).unwrap();
    book.submit(Side::Ask, 101, 1).unwrap();
    book.submit(Side::Ask, 102, 1).unwrap();
    book.submit(Side::Ask, 105, 1).unwrap();

    let bid = book.submit(Side::Bid, 104, 10).unwrap();

    let prices: Vec<u64> = bid.matches.iter().map(|m| m.price).collect();
    assert_eq!(prices, vec![101, 102, 103]);
    assert_eq!(bid.remaining, 7);
    assert_eq!(book.best_ask(), Some(105));
    assert_eq!(book.best_bid(), Some(104));
}

#[test]
fn cancel_partially_filled_order() {
    let mut book = book();
    let resting = book.submit(Side::Ask, 100, 10).unwrap();
    let other = book.submit(Side::Ask, 100, 5).unwrap();
    book.submit(Side::Bid, 100, 4).unwrap();
    assert_eq!(book.volume_at(Side::Ask, 100), 11);

    let cancelled = book.cancel(resting.order_id).unwrap();

    assert_eq!(cancelled.remaining, 6);
    assert_eq!(cancelled.filled_quantity(), 4);
    assert_eq!(book.volume_at(Side::Ask, 100), 5);
    assert_eq!(book.asks().level_at(100).unwrap().len(), 1);

    // Removing the last order at the price drops the level everywhere
    book.cancel(other.order_id).unwrap();
    assert!(book.asks().level_at(100).is_none());
    assert_eq!(book.ask_levels(), 0);
    assert_eq!(book.asks().prices().count(), 0);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn cancel_is_not_repeatable() {
    let mut book = book();
    let placed = book.submit(Side::Bid, 100, 1).unwrap();

    assert!(book.cancel(placed.order_id).is_ok());
    assert_eq!(book.cancel(placed.order_id), Err(BookError::NotFound(placed.order_id)));
    assert_eq!(book.cancel(placed.order_id), Err(BookError::NotFound(placed.order_id)));
}

#[test]
fn cancel_keeps_time_priority_of_others() {
    let mut book = book();
    let a = book.submit(Side::Bid, 100, 1).unwrap();
    let b = book.submit(Side::Bid, 100, 1).unwrap();
    let c = book.submit(Side::Bid, 100, 1).unwrap();

    book.cancel(b.order_id).unwrap();
    let ask = book.submit(Side::Ask, 100, 2).unwrap();

    let resting: Vec<u64> = ask.matches.iter().map(|m| m.resting_order_id).collect();
    assert_eq!(resting, vec![a.order_id, c.order_id]);
}

#[test]
fn oversized_order_is_rejected_without_touching_the_level() {
    let mut book = book();
    book.submit(Side::Ask, 100, u64::MAX - 5).unwrap();

    let rejected = book.submit(Side::Ask, 100, 6);

    assert!(matches!(rejected, Err(BookError::InvalidArgument(_))));
    assert_eq!(book.volume_at(Side::Ask, 100), u64::MAX - 5);
    assert_eq!(book.ask_count(), 1);

    // The full level can still be taken in one go
    let bid = book.submit(Side::Bid, 100, u64::MAX).unwrap();
    assert_eq!(bid.filled(), u64::MAX - 5);
    assert_eq!(bid.remaining, 5);
    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), None);
}

#[test]
fn incoming_better_price_trades_at_resting_price() {
    let mut book = book();
    book.submit(Side::Ask, 100, 5).unwrap();

    let bid = book.submit(Side::Bid, 110, 5).unwrap();

    assert_eq!(bid.matches[0].price, 100);
    assert!(book.is_empty());
}
