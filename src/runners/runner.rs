//! # Output-only coalescing runner.
//!
//! [`Runner`] is the basic flavor: completion (and failure) events only. It
//! shares the [`ProgressRunner`](crate::ProgressRunner) machinery with the
//! progress parameter fixed to `()`; operations built with
//! [`OpFn::plain`](crate::OpFn::plain) or
//! [`OpFn::cancellable`](crate::OpFn::cancellable) slot in directly.

use std::sync::Arc;

use crate::error::OpError;
use crate::ops::Operation;
use crate::runners::progress::ProgressRunner;
use crate::subscribers::{Subscribe, SubscriptionId};

/// Coalescing runner without a progress channel.
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use supersede::{OpError, OpFn, Runner};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
///
/// let runner = Runner::new(OpFn::cancellable(
///     |n: u64, ctx: CancellationToken| async move {
///         tokio::select! {
///             _ = tokio::time::sleep(Duration::from_millis(n)) => Ok(n * 2),
///             _ = ctx.cancelled() => Err(OpError::Canceled),
///         }
///     },
/// ));
/// runner.on_completed(move |out: &u64| {
///     let _ = tx.send(*out);
/// });
///
/// runner.run(10);
/// assert_eq!(rx.recv().await, Some(20));
/// # }
/// ```
pub struct Runner<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    inner: ProgressRunner<I, O, ()>,
}

impl<I, O> Runner<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    /// Creates a runner with default configuration and a dispatcher spawned
    /// onto the current Tokio runtime.
    ///
    /// Use [`ProgressRunner::builder`] (and [`From`]) when a name, custom
    /// [`Config`](crate::Config), or detached dispatch is needed.
    pub fn new(op: impl Operation<I, O, ()>) -> Self {
        Self {
            inner: ProgressRunner::new(op),
        }
    }

    /// Records `input` as the current request and starts (or restarts) the
    /// operation against it. Never blocks; safe to call from any task.
    pub fn run(&self, input: I) {
        self.inner.run(input);
    }

    /// Halts the runner and suppresses the in-flight instance's completion.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// True while an operation instance is running or about to restart.
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Returns the runner name used in diagnostics.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Registers a subscriber; events reach it in delivery order.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe<O, ()>>) -> SubscriptionId {
        self.inner.subscribe(sub)
    }

    /// Unregisters a subscriber; returns `false` for an unknown id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// Registers a closure invoked with each completion output.
    pub fn on_completed<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&O) + Send + Sync + 'static,
    {
        self.inner.on_completed(f)
    }

    /// Registers a closure invoked with each genuine operation failure.
    pub fn on_failed<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&OpError) + Send + Sync + 'static,
    {
        self.inner.on_failed(f)
    }
}

impl<I, O> From<ProgressRunner<I, O, ()>> for Runner<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    fn from(inner: ProgressRunner<I, O, ()>) -> Self {
        Self { inner }
    }
}
