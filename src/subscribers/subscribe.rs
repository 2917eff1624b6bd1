//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing a runner: progress
//! values, the authoritative completion, and genuine operation failures.
//! Every hook has an empty default body, so a subscriber implements only
//! what it cares about.
//!
//! Callbacks are invoked by the runner's [`Dispatcher`](crate::Dispatcher)
//! on the delivery context, sequentially and in event order. Panics are
//! caught and reported; they never take down delivery.
//!
//! ## Example
//! ```
//! use async_trait::async_trait;
//! use supersede::{OpError, Subscribe};
//!
//! struct HitCounter;
//!
//! #[async_trait]
//! impl Subscribe<usize> for HitCounter {
//!     async fn on_completed(&self, hits: &usize) {
//!         println!("{hits} hits");
//!     }
//!
//!     async fn on_failed(&self, error: &OpError) {
//!         eprintln!("search failed: {error}");
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "hit-counter"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::OpError;

/// Observer of one runner's event stream.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the delivery context.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe<O, P = ()>: Send + Sync + 'static
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Called for each progress value, in emission order.
    async fn on_progress(&self, _progress: &P) {}

    /// Called with the final output of a run that was neither superseded
    /// nor stopped. At most once per activation.
    async fn on_completed(&self, _output: &O) {}

    /// Called when the operation fails for a reason other than
    /// cancellation. No completion follows.
    async fn on_failed(&self, _error: &OpError) {}

    /// Returns the subscriber name used in panic/drop diagnostics.
    ///
    /// Prefer short, descriptive names; the default uses
    /// `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
