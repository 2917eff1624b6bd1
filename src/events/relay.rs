//! # Relay: ordered conduit from the run-loop to the delivery context.
//!
//! The relay is a thin wrapper around an unbounded [`tokio::sync::mpsc`]
//! channel carrying [`RunEvent`]s. Sends never block and never reorder, so
//! the progress of an instance always precedes its completion in the
//! stream. The receiving end is drained by the
//! [`Dispatcher`](crate::Dispatcher) on whatever context the owner chose.
//!
//! ## Rules
//! - **Non-blocking publish**: `progress`/`completed`/`failed` return
//!   immediately from any context, including the operation's own task.
//! - **FIFO**: one channel, one consumer; global event order is preserved.
//! - **No persistence**: if the dispatcher is gone, the event is dropped
//!   and a diagnostic is printed to stderr.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::OpError;
use crate::events::event::RunEvent;

/// Creates a connected relay pair for one runner.
pub(crate) fn channel<O, P>(name: Arc<str>) -> (RelaySender<O, P>, RelayReceiver<O, P>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RelaySender { name, tx }, RelayReceiver { rx })
}

/// Sending half of the relay; cheap to clone.
pub(crate) struct RelaySender<O, P> {
    name: Arc<str>,
    tx: mpsc::UnboundedSender<RunEvent<O, P>>,
}

impl<O, P> RelaySender<O, P> {
    pub(crate) fn progress(&self, progress: P) {
        self.send(RunEvent::Progress(progress));
    }

    pub(crate) fn completed(&self, output: O) {
        self.send(RunEvent::Completed(output));
    }

    pub(crate) fn failed(&self, error: OpError) {
        self.send(RunEvent::Failed(error));
    }

    fn send(&self, event: RunEvent<O, P>) {
        if let Err(dropped) = self.tx.send(event) {
            eprintln!(
                "[supersede] runner '{}' dropped {} event: dispatcher gone",
                self.name,
                dropped.0.as_label()
            );
        }
    }
}

impl<O, P> Clone for RelaySender<O, P> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            tx: self.tx.clone(),
        }
    }
}

/// Receiving half of the relay; consumed by the dispatcher.
pub(crate) struct RelayReceiver<O, P> {
    rx: mpsc::UnboundedReceiver<RunEvent<O, P>>,
}

impl<O, P> RelayReceiver<O, P> {
    /// Awaits the next event; `None` once every sender is gone and the
    /// stream is drained.
    pub(crate) async fn recv(&mut self) -> Option<RunEvent<O, P>> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preserves_emission_order() {
        let (tx, mut rx) = channel::<u32, u32>(Arc::from("test"));
        tx.progress(1);
        tx.progress(2);
        tx.completed(9);
        drop(tx);

        assert!(matches!(rx.recv().await, Some(RunEvent::Progress(1))));
        assert!(matches!(rx.recv().await, Some(RunEvent::Progress(2))));
        assert!(matches!(rx.recv().await, Some(RunEvent::Completed(9))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn send_without_receiver_is_a_noop() {
        let (tx, rx) = channel::<u32, u32>(Arc::from("test"));
        drop(rx);
        tx.completed(1);
    }
}
