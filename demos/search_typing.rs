//! # Example: search_typing
//!
//! Simulates search-as-you-type against a slow backend: every keystroke
//! calls `run()` with the newest query, and the runner cancels whatever
//! stale lookup is still in flight.
//!
//! Shows how to:
//! - Build a [`Runner`] around a cancellable operation
//! - Subscribe to completions with a closure
//! - Observe that only the latest query's result is delivered
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► run(50)   ── lookup starts (needs 50ms)
//!   ├─► run(500)  ── 30ms later: lookup(50) cancelled, lookup(500) starts
//!   ├─► run(300)  ── 30ms later: lookup(500) cancelled, lookup(300) starts
//!   └─► lookup(300) completes ──► exactly one completion: 300
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example search_typing
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use supersede::{OpError, OpFn, Runner};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== search_typing example ===\n");

    let cancels = Arc::new(AtomicUsize::new(0));

    // The "backend": sleeps `n` ms, then returns `n` as its answer.
    let counter = Arc::clone(&cancels);
    let runner = Runner::new(OpFn::cancellable(move |n: u64, ctx: CancellationToken| {
        let counter = Arc::clone(&counter);
        async move {
            println!("[lookup] started for query {n}");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(n)) => {
                    println!("[lookup] finished for query {n}");
                    Ok(n)
                }
                _ = ctx.cancelled() => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    println!("[lookup] cancelled for query {n}");
                    Err(OpError::Canceled)
                }
            }
        }
    }));

    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    runner.on_completed(move |out: &u64| {
        println!("[results] showing results for query {out}");
        let _ = done_tx.send(*out);
    });

    // Type three "queries" faster than any lookup can finish.
    for query in [50u64, 500, 300] {
        runner.run(query);
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    let delivered = done_rx.recv().await.expect("one completion");
    println!("\ndelivered: {delivered}");
    println!("cancelled lookups: {}", cancels.load(Ordering::SeqCst));
    assert_eq!(delivered, 300);
    assert_eq!(cancels.load(Ordering::SeqCst), 2);

    println!("\n=== example completed successfully ===");
    Ok(())
}
