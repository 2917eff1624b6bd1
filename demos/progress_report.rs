//! # Example: progress_report
//!
//! Demonstrates the progress-reporting runner flavor with an owner-driven
//! dispatcher: all callbacks fire on the task that drives delivery, the
//! way a UI thread would drain its queue.
//!
//! Shows how to:
//! - Build a [`ProgressRunner`] with [`RunnerBuilder::build_detached`]
//! - Report percentage progress from inside the operation
//! - Drive the [`Dispatcher`] on a context of your choosing
//!
//! ## Run
//! ```bash
//! cargo run --example progress_report
//! ```

use std::time::Duration;

use supersede::{OpError, OpFn, ProgressRunner, ProgressSink};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== progress_report example ===\n");

    // A staged job: four chunks of work, one percentage report per chunk.
    let op = OpFn::new(
        |pages: u32, progress: ProgressSink<u32>, ctx: CancellationToken| async move {
            for chunk in 1..=4u32 {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(40)) => {
                        progress.emit(chunk * 25);
                    }
                    _ = ctx.cancelled() => return Err(OpError::Canceled),
                }
            }
            Ok(pages * 2)
        },
    );

    let (runner, dispatcher): (ProgressRunner<u32, u32, u32>, _) =
        ProgressRunner::builder(op).name("indexer").build_detached();

    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    runner.on_progress(|pct: &u32| println!("[indexer] {pct}%"));
    runner.on_completed(move |out: &u32| {
        println!("[indexer] done: {out} entries");
        let _ = done_tx.send(*out);
    });

    // Deliver on a dedicated task; a UI would await this on its own loop.
    let delivery = tokio::spawn(dispatcher.run());

    runner.run(100);
    let entries = done_rx.recv().await.expect("one completion");
    assert_eq!(entries, 200);

    // Dropping the runner lets the dispatcher drain and exit.
    drop(runner);
    delivery.await?;

    println!("\n=== example completed successfully ===");
    Ok(())
}
