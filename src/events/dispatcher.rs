//! # Dispatcher: delivers relay events to subscribers on a chosen context.
//!
//! The dispatcher drains the runner's relay in FIFO order and fans each
//! event out to the registered subscribers, awaiting them sequentially.
//! Whatever task drives [`Dispatcher::run`] *is* the delivery context:
//! callbacks never run on the background operation's own task.
//!
//! ## Architecture
//! ```text
//! run-loop ── relay (FIFO) ──► Dispatcher::run() ──► subscriber 1 .. N
//!                              (spawned by default,       │
//!                               or owner-driven)          └─ panics caught
//! ```
//!
//! ## Rules
//! - Events are delivered one at a time, in relay order.
//! - Firing with zero subscribers is a no-op; a `Failed` event with zero
//!   subscribers is additionally reported on stderr so a genuine operation
//!   failure is never silently dropped.
//! - A panicking subscriber is isolated: the panic is caught and reported,
//!   and delivery continues with the next subscriber.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::events::event::RunEvent;
use crate::events::relay::RelayReceiver;
use crate::subscribers::SubscriberSet;

/// Drains one runner's events and fans them out to its subscribers.
///
/// Obtained from
/// [`RunnerBuilder::build_detached`](crate::RunnerBuilder::build_detached)
/// when the owner wants delivery on its own context; otherwise the builder
/// spawns it onto the runtime.
pub struct Dispatcher<O, P = ()>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    name: Arc<str>,
    rx: RelayReceiver<O, P>,
    subs: Arc<SubscriberSet<O, P>>,
}

impl<O, P> Dispatcher<O, P>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    pub(crate) fn new(
        name: Arc<str>,
        rx: RelayReceiver<O, P>,
        subs: Arc<SubscriberSet<O, P>>,
    ) -> Self {
        Self { name, rx, subs }
    }

    /// Drives delivery until the runner (and every progress sink) is gone
    /// and the stream is drained.
    ///
    /// The task awaiting this future is the delivery context for all
    /// subscriber callbacks.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.deliver(&event).await;
        }
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn deliver(&self, event: &RunEvent<O, P>) {
        let subs = self.subs.snapshot();
        if subs.is_empty() {
            if let RunEvent::Failed(error) = event {
                eprintln!(
                    "[supersede] runner '{}' operation failed with no subscribers: {error}",
                    self.name
                );
            }
            return;
        }

        for sub in subs {
            let fut = async {
                match event {
                    RunEvent::Progress(progress) => sub.on_progress(progress).await,
                    RunEvent::Completed(output) => sub.on_completed(output).await,
                    RunEvent::Failed(error) => sub.on_failed(error).await,
                }
            };
            if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                eprintln!(
                    "[supersede] subscriber '{}' panicked: {:?}",
                    sub.name(),
                    panic_err
                );
            }
        }
    }
}
