//! limit-book demo binary.
//!
//! Replays a short session against one book and prints the matches and the
//! resulting ladder. Set `RUST_LOG=limit_book=debug` to see the book's own
//! events; the book size comes from `LIMIT_BOOK_ORDER_CAPACITY`.

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use limit_book::types::price::{from_fixed_trimmed, SCALE};
use limit_book::{BookConfig, OrderBook, Side, SubmitResult};

fn report(label: &str, result: &SubmitResult) {
    println!(
        "{label}: order {} -> {} match(es), remaining {}",
        result.order_id,
        result.matches.len(),
        from_fixed_trimmed(result.remaining)
    );
    for m in &result.matches {
        println!(
            "    trade {}: resting {} vs incoming {} @ {} x {}",
            m.id,
            m.resting_order_id,
            m.incoming_order_id,
            from_fixed_trimmed(m.price),
            from_fixed_trimmed(m.quantity)
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BookConfig::from_env()?;
    info!(?config, "starting book");
    let mut book = OrderBook::with_config(config);

    println!("===========================================");
    println!("  limit-book session");
    println!("===========================================");

    let first = book.submit(Side::Bid, 100 * SCALE, 5 * SCALE)?;
    report("bid 100 x 5", &first);
    report("bid 100 x 3", &book.submit(Side::Bid, 100 * SCALE, 3 * SCALE)?);
    report("ask 100 x 6", &book.submit(Side::Ask, 100 * SCALE, 6 * SCALE)?);

    report("ask 102 x 6", &book.submit(Side::Ask, 102 * SCALE, 6 * SCALE)?);
    report("ask 101 x 4", &book.submit(Side::Ask, 101 * SCALE, 4 * SCALE)?);
    let sweep = book.submit(Side::Bid, 101 * SCALE, 10 * SCALE)?;
    report("bid 101 x 10", &sweep);

    let cancelled = book.cancel(sweep.order_id)?;
    println!("cancelled {cancelled}");

    let snapshot = book.snapshot(10);
    println!();
    print!("{}", snapshot.render());
    println!();
    println!("state root: {}", snapshot.state_root_hex());

    book.check_invariants()?;
    Ok(())
}
