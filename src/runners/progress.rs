//! # Progress-reporting runner.
//!
//! [`ProgressRunner`] is the full-surface flavor: besides the authoritative
//! completion event it forwards progress values emitted by the active
//! operation instance. The output-only [`Runner`](crate::Runner) is a thin
//! wrapper over this type with the progress parameter fixed to `()`.

use std::sync::Arc;

use crate::ops::Operation;
use crate::runners::builder::RunnerBuilder;
use crate::runners::machine::Machine;
use crate::subscribers::{
    OnCompleted, OnFailed, OnProgress, Subscribe, SubscriberSet, SubscriptionId,
};

/// Coalescing runner with a progress channel.
///
/// `run(input)` starts the operation, or cancels and later restarts it when
/// an instance is already in flight; only the latest input's result is ever
/// delivered. Progress flows through the same FIFO delivery pipeline, so
/// a run's progress always arrives before its completion.
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use supersede::{OpError, OpFn, ProgressRunner, OnCompleted};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
///
/// let runner: ProgressRunner<u64, u64, u8> = ProgressRunner::new(OpFn::new(
///     |n: u64, progress, ctx: CancellationToken| async move {
///         progress.emit(50u8);
///         tokio::select! {
///             _ = tokio::time::sleep(Duration::from_millis(n)) => Ok(n),
///             _ = ctx.cancelled() => Err(OpError::Canceled),
///         }
///     },
/// ));
/// runner.subscribe(OnCompleted::arc(move |out: &u64| {
///     let _ = tx.send(*out);
/// }));
///
/// runner.run(10);
/// assert_eq!(rx.recv().await, Some(10));
/// # }
/// ```
pub struct ProgressRunner<I, O, P = ()>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    machine: Machine<I, O, P>,
    subs: Arc<SubscriberSet<O, P>>,
}

impl<I, O, P> ProgressRunner<I, O, P>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Creates a runner with default configuration and a dispatcher spawned
    /// onto the current Tokio runtime.
    pub fn new(op: impl Operation<I, O, P>) -> Self {
        RunnerBuilder::new(op).build()
    }

    /// Returns a [`RunnerBuilder`] for named/configured construction.
    pub fn builder(op: impl Operation<I, O, P>) -> RunnerBuilder<I, O, P> {
        RunnerBuilder::new(op)
    }

    pub(crate) fn assemble(machine: Machine<I, O, P>, subs: Arc<SubscriberSet<O, P>>) -> Self {
        Self { machine, subs }
    }

    /// Records `input` as the current request and starts (or restarts) the
    /// operation against it. Never blocks; safe to call from any task.
    pub fn run(&self, input: I) {
        self.machine.run(input);
    }

    /// Halts the runner: the in-flight instance (if any) is asked to
    /// cancel and no completion event will fire for it, even if it manages
    /// to produce a result. A later `run()` starts fresh.
    pub fn stop(&self) {
        self.machine.stop();
    }

    /// True while an operation instance is running or about to restart.
    pub fn is_running(&self) -> bool {
        self.machine.is_running()
    }

    /// Returns the runner name used in diagnostics.
    pub fn name(&self) -> &str {
        self.machine.name()
    }

    /// Registers a subscriber; events reach it in delivery order.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe<O, P>>) -> SubscriptionId {
        self.subs.insert(sub)
    }

    /// Unregisters a subscriber; returns `false` for an unknown id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subs.remove(id)
    }

    /// Registers a closure invoked with each completion output.
    pub fn on_completed<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&O) + Send + Sync + 'static,
    {
        self.subscribe(OnCompleted::arc(f))
    }

    /// Registers a closure invoked with each progress value.
    pub fn on_progress<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.subscribe(OnProgress::arc(f))
    }

    /// Registers a closure invoked with each genuine operation failure.
    pub fn on_failed<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&crate::OpError) + Send + Sync + 'static,
    {
        self.subscribe(OnFailed::arc(f))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::time::sleep;
    use tokio_util::sync::CancellationToken;

    use crate::config::{Config, StaleProgress};
    use crate::error::OpError;
    use crate::ops::{OpFn, ProgressSink};
    use crate::runners::progress::ProgressRunner;

    /// Tap on the delivery stream: records progress and completions in
    /// arrival order, tagged so interleaving can be asserted.
    #[derive(Debug, PartialEq, Eq, Clone)]
    enum Seen {
        Progress(u32),
        Completed(u32),
        Failed(String),
    }

    fn tap(runner: &ProgressRunner<u32, u32, u32>) -> mpsc::UnboundedReceiver<Seen> {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx2 = tx.clone();
        let tx3 = tx.clone();
        runner.on_progress(move |p: &u32| {
            let _ = tx.send(Seen::Progress(*p));
        });
        runner.on_completed(move |o: &u32| {
            let _ = tx2.send(Seen::Completed(*o));
        });
        runner.on_failed(move |e: &OpError| {
            let _ = tx3.send(Seen::Failed(e.as_label().into()));
        });
        rx
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Vec<Seen> {
        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            seen.push(ev);
        }
        seen
    }

    /// Reports `n + step` at thirds, sleeping between emission points.
    fn staged_op() -> OpFn<u32, u32, u32> {
        OpFn::new(
            |n: u32, progress: ProgressSink<u32>, ctx: CancellationToken| async move {
                for step in 1..=3u32 {
                    tokio::select! {
                        _ = sleep(Duration::from_millis(u64::from(n) / 3)) => {
                            progress.emit(n + step);
                        }
                        _ = ctx.cancelled() => return Err(OpError::Canceled),
                    }
                }
                Ok(n)
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn progress_arrives_in_order_before_completion() {
        let runner = ProgressRunner::new(staged_op());
        let mut rx = tap(&runner);

        runner.run(30);
        sleep(Duration::from_millis(50)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                Seen::Progress(31),
                Seen::Progress(32),
                Seen::Progress(33),
                Seen::Completed(30),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn progress_count_matches_emission_points_reached() {
        let runner = ProgressRunner::new(staged_op());
        let mut rx = tap(&runner);

        runner.run(300);
        // Two emission points pass (at 100 and 200), then supersede.
        sleep(Duration::from_millis(250)).await;
        runner.run(30);
        sleep(Duration::from_millis(60)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                Seen::Progress(301),
                Seen::Progress(302),
                Seen::Progress(31),
                Seen::Progress(32),
                Seen::Progress(33),
                Seen::Completed(30),
            ]
        );
    }

    /// Emits once, then parks until cancelled; after acknowledging the
    /// cancel it emits again before unwinding.
    fn late_emitter() -> OpFn<u32, u32, u32> {
        OpFn::new(
            |n: u32, progress: ProgressSink<u32>, ctx: CancellationToken| async move {
                progress.emit(n);
                if n == 1 {
                    ctx.cancelled().await;
                    progress.emit(99);
                    return Err(OpError::Canceled);
                }
                Ok(n)
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn stale_progress_is_delivered_by_default() {
        let runner = ProgressRunner::new(late_emitter());
        let mut rx = tap(&runner);

        runner.run(1);
        sleep(Duration::from_millis(5)).await;
        runner.run(2);
        sleep(Duration::from_millis(5)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                Seen::Progress(1),
                Seen::Progress(99),
                Seen::Progress(2),
                Seen::Completed(2),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_progress_is_dropped_when_suppressed() {
        let mut cfg = Config::default();
        cfg.stale_progress = StaleProgress::Suppress;
        let runner = ProgressRunner::builder(late_emitter()).config(cfg).build();
        let mut rx = tap(&runner);

        runner.run(1);
        sleep(Duration::from_millis(5)).await;
        runner.run(2);
        sleep(Duration::from_millis(5)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                Seen::Progress(1),
                Seen::Progress(2),
                Seen::Completed(2),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reaches_on_failed_and_nothing_else() {
        let runner: ProgressRunner<u32, u32, u32> =
            ProgressRunner::new(OpFn::plain(|n: u32| async move {
                if n == 13 {
                    return Err(OpError::fail("unlucky"));
                }
                Ok(n)
            }));
        let mut rx = tap(&runner);

        runner.run(13);
        sleep(Duration::from_millis(5)).await;

        assert_eq!(drain(&mut rx), vec![Seen::Failed("op_failed".into())]);
        assert!(!runner.is_running());

        // The runner stays usable after a failure.
        runner.run(7);
        sleep(Duration::from_millis(5)).await;
        assert_eq!(drain(&mut rx), vec![Seen::Completed(7)]);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_subscriber_does_not_break_delivery() {
        let runner: ProgressRunner<u32, u32, u32> =
            ProgressRunner::new(OpFn::plain(|n: u32| async move { Ok(n) }));

        runner.on_completed(|_out: &u32| panic!("subscriber bug"));
        let (tx, mut rx) = mpsc::unbounded_channel();
        runner.on_completed(move |out: &u32| {
            let _ = tx.send(*out);
        });

        runner.run(4);
        sleep(Duration::from_millis(5)).await;
        assert_eq!(rx.try_recv().ok(), Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_stops_future_deliveries() {
        let runner: ProgressRunner<u32, u32, u32> =
            ProgressRunner::new(OpFn::plain(|n: u32| async move { Ok(n) }));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = runner.on_completed(move |out: &u32| {
            let _ = tx.send(*out);
        });

        runner.run(1);
        sleep(Duration::from_millis(5)).await;
        assert_eq!(rx.try_recv().ok(), Some(1));

        assert!(runner.unsubscribe(id));
        runner.run(2);
        sleep(Duration::from_millis(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn firing_with_zero_subscribers_is_a_noop() {
        let runner: ProgressRunner<u32, u32, u32> = ProgressRunner::new(staged_op());
        runner.run(3);
        sleep(Duration::from_millis(50)).await;
        assert!(!runner.is_running());

        // A late subscriber only sees later activations.
        let (tx, mut rx) = mpsc::unbounded_channel();
        runner.on_completed(move |out: &u32| {
            let _ = tx.send(*out);
        });
        runner.run(6);
        sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.try_recv().ok(), Some(6));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_suppresses_the_orphan_instance() {
        let cancels = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&cancels);
        let runner: ProgressRunner<u32, u32, u32> = ProgressRunner::new(OpFn::cancellable(
            move |n: u32, ctx: CancellationToken| {
                let seen = Arc::clone(&seen);
                async move {
                    tokio::select! {
                        _ = sleep(Duration::from_millis(u64::from(n))) => Ok(n),
                        _ = ctx.cancelled() => {
                            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                            Err(OpError::Canceled)
                        }
                    }
                }
            },
        ));
        let mut rx = tap(&runner);

        runner.run(100);
        sleep(Duration::from_millis(10)).await;
        drop(runner);
        sleep(Duration::from_millis(200)).await;

        assert_eq!(cancels.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(drain(&mut rx).is_empty());
    }
}
