//! # supersede
//!
//! **Supersede** is a latest-wins coalescing runner for expensive async
//! operations.
//!
//! Feed it a rapid sequence of inputs (think search-as-you-type) and it
//! keeps at most one operation instance in flight: a newer input cancels
//! the stale instance and, once that instance acknowledges the cancel and
//! unwinds, restarts against the newest input. Only the result of the
//! latest non-superseded run is ever delivered; superseded results are
//! discarded, never observed by subscribers.
//!
//! ## Architecture
//! ```text
//!  run(input) / stop()              (any caller task)
//!        │
//!        ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Runner / ProgressRunner                             │
//! │  - latest-input slot (mutex)                         │
//! │  - stop flag (atomic)                                │
//! │  - one CancellationToken per operation instance      │
//! └──────┬───────────────────────────────────────────────┘
//!        ▼
//! ┌──────────────┐   emits    ┌───────────────────────┐
//! │   run-loop   │──────────► │  relay (FIFO channel) │
//! │ (one task,   │  Progress/ └──────────┬────────────┘
//! │  restarts    │  Completed/           ▼
//! │  itself)     │  Failed      ┌─────────────────┐
//! └──────┬───────┘              │   Dispatcher    │  (spawned, or driven
//!        │ op.run(input,        └────────┬────────┘   on the owner's task)
//!        ▼        sink, token)           ▼
//! ┌──────────────┐              ┌─────────────────┐
//! │  Operation   │              │  SubscriberSet  │
//! │ (user async  │              │ on_progress()   │
//! │  fn, checks  │              │ on_completed()  │
//! │  its token)  │              │ on_failed()     │
//! └──────────────┘              └─────────────────┘
//! ```
//!
//! ## Guarantees
//! - At most one operation instance is active at any instant; the restart
//!   is performed by the unwinding instance itself, never by the caller.
//! - The completion event fires at most once per activation and always
//!   carries the output of the latest input that ran uninterrupted.
//! - After `stop()`, the in-flight instance unwinds silently; nothing
//!   fires, even if it produced a result.
//! - Progress values arrive in emission order, strictly before the same
//!   run's completion.
//! - Cancellation is cooperative: the runner requests it through the
//!   instance's token and tolerates an arbitrarily slow unwind.
//!
//! ## Features
//! | Area            | Description                                           | Key types / traits                     |
//! |-----------------|-------------------------------------------------------|----------------------------------------|
//! | **Runners**     | Latest-wins coalescing with cooperative cancellation. | [`Runner`], [`ProgressRunner`]         |
//! | **Operations**  | Async cancelable units in four closure shapes.        | [`Operation`], [`OpFn`], [`OpRef`]     |
//! | **Subscribers** | Observe progress, completion, and failures.           | [`Subscribe`], [`OnCompleted`]         |
//! | **Delivery**    | FIFO event delivery on a context the owner picks.     | [`Dispatcher`], [`RunEvent`]           |
//! | **Errors**      | Cancellation vs. genuine failure.                     | [`OpError`]                            |
//! | **Config**      | Stale-progress policy.                                | [`Config`], [`StaleProgress`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`EventPrinter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use supersede::{OpError, OpFn, Runner};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!
//!     // The expensive operation: sleeps `n` ms, then answers.
//!     let runner = Runner::new(OpFn::cancellable(
//!         |n: u64, ctx: CancellationToken| async move {
//!             tokio::select! {
//!                 _ = tokio::time::sleep(Duration::from_millis(n)) => Ok(n),
//!                 _ = ctx.cancelled() => Err(OpError::Canceled),
//!             }
//!         },
//!     ));
//!     runner.on_completed(move |out: &u64| {
//!         let _ = tx.send(*out);
//!     });
//!
//!     // Three rapid requests: the first two are superseded, and only the
//!     // last one's result is delivered.
//!     runner.run(50);
//!     runner.run(500);
//!     runner.run(300);
//!
//!     assert_eq!(rx.recv().await, Some(300));
//! }
//! ```

mod config;
mod error;
mod events;
mod ops;
mod runners;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, StaleProgress};
pub use error::OpError;
pub use events::{Dispatcher, RunEvent};
pub use ops::{BoxOpFuture, OpFn, OpRef, Operation, ProgressSink};
pub use runners::{ProgressRunner, Runner, RunnerBuilder};
pub use subscribers::{
    OnCompleted, OnFailed, OnProgress, Subscribe, SubscriberSet, SubscriptionId,
};

// Optional: expose a simple built-in printer subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::EventPrinter;
