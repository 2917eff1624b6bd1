//! Builder wiring a runner's machine, relay, and delivery together.

use std::borrow::Cow;
use std::sync::Arc;

use crate::config::Config;
use crate::events::relay;
use crate::events::Dispatcher;
use crate::ops::{OpRef, Operation};
use crate::runners::machine::Machine;
use crate::runners::progress::ProgressRunner;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a runner with optional features.
///
/// ## Example
/// ```
/// use supersede::{Config, OpFn, ProgressRunner, StaleProgress};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut cfg = Config::default();
/// cfg.stale_progress = StaleProgress::Suppress;
///
/// let runner: ProgressRunner<String, usize, u8> =
///     ProgressRunner::builder(OpFn::plain(|q: String| async move { Ok(q.len()) }))
///         .name("search")
///         .config(cfg)
///         .build();
/// assert_eq!(runner.name(), "search");
/// # }
/// ```
pub struct RunnerBuilder<I, O, P = ()>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    name: Cow<'static, str>,
    op: OpRef<I, O, P>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe<O, P>>>,
}

impl<I, O, P> RunnerBuilder<I, O, P>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Creates a new builder around the given operation.
    pub fn new(op: impl Operation<I, O, P>) -> Self {
        Self {
            name: Cow::Borrowed("runner"),
            op: Arc::new(op),
            cfg: Config::default(),
            subscribers: Vec::new(),
        }
    }

    /// Sets the runner name used in diagnostics.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the runner configuration.
    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Registers subscribers ahead of the first `run()`.
    ///
    /// More can be added (or removed) later through the runner itself.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe<O, P>>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the runner and spawns its dispatcher onto the current Tokio
    /// runtime. Must be called within a runtime.
    pub fn build(self) -> ProgressRunner<I, O, P> {
        let (runner, dispatcher) = self.build_detached();
        dispatcher.spawn();
        runner
    }

    /// Builds the runner and hands back its [`Dispatcher`] undriven.
    ///
    /// The owner decides where delivery happens by awaiting
    /// [`Dispatcher::run`] on a context of its choosing (a dedicated task,
    /// a UI-facing loop, a test body).
    pub fn build_detached(self) -> (ProgressRunner<I, O, P>, Dispatcher<O, P>) {
        let name: Arc<str> = Arc::from(self.name.as_ref());
        let (tx, rx) = relay::channel(Arc::clone(&name));

        let subs = Arc::new(SubscriberSet::new());
        for sub in self.subscribers {
            subs.insert(sub);
        }

        let machine = Machine::new(Arc::clone(&name), self.op, tx, self.cfg);
        let dispatcher = Dispatcher::new(name, rx, Arc::clone(&subs));
        (ProgressRunner::assemble(machine, subs), dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OpFn;
    use crate::subscribers::OnCompleted;

    #[tokio::test]
    async fn detached_dispatcher_delivers_on_the_driving_task() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let (runner, dispatcher) = RunnerBuilder::<u32, u32>::new(OpFn::plain(
            |n: u32| async move { Ok(n * 3) },
        ))
        .name("detached")
        .with_subscribers(vec![OnCompleted::arc(move |out: &u32| {
            let _ = tx.send(*out);
        })])
        .build_detached();

        let driver = tokio::spawn(dispatcher.run());
        runner.run(5);

        assert_eq!(rx.recv().await, Some(15));

        // Once the runner is gone the dispatcher drains and exits.
        drop(runner);
        driver.await.expect("dispatcher task");
    }
}
