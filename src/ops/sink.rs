//! # Progress sink handed to a running operation.
//!
//! [`ProgressSink`] is the operation-facing end of the progress relay. Each
//! operation instance receives its own sink, bound to that instance's
//! cancellation token. Emissions are forwarded, in order and without
//! blocking, to the runner's delivery pipeline; they are never invoked on
//! the operation's own execution context.
//!
//! Under [`StaleProgress::Suppress`] the sink drops emissions once the
//! instance's token has been signaled; under [`StaleProgress::Deliver`]
//! (the default) late emissions still go through.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::StaleProgress;

struct SinkShared<P> {
    forward: Box<dyn Fn(P) + Send + Sync>,
    token: CancellationToken,
    stale: StaleProgress,
}

/// Ordered, non-blocking progress emitter for one operation instance.
///
/// Cheap to clone; all clones feed the same instance's emission stream.
/// Operations that never report progress can simply ignore it.
///
/// # Example
/// ```
/// use supersede::ProgressSink;
///
/// // A detached sink swallows emissions; useful when driving an
/// // `Operation` by hand in tests.
/// let sink: ProgressSink<u32> = ProgressSink::detached();
/// sink.emit(42);
/// ```
pub struct ProgressSink<P> {
    shared: Option<Arc<SinkShared<P>>>,
}

impl<P> ProgressSink<P> {
    /// Builds the sink for one operation instance.
    pub(crate) fn for_instance(
        forward: Box<dyn Fn(P) + Send + Sync>,
        token: CancellationToken,
        stale: StaleProgress,
    ) -> Self {
        Self {
            shared: Some(Arc::new(SinkShared {
                forward,
                token,
                stale,
            })),
        }
    }

    /// Returns a sink that swallows every emission.
    ///
    /// Useful for invoking an [`Operation`](crate::Operation) directly,
    /// outside a runner.
    pub fn detached() -> Self {
        Self { shared: None }
    }

    /// Emits one progress value.
    ///
    /// Returns immediately; the value is handed to subscribers on the
    /// delivery context, in emission order. Emissions may be dropped when
    /// the instance has been cancelled and the runner is configured with
    /// [`StaleProgress::Suppress`].
    pub fn emit(&self, progress: P) {
        let Some(shared) = &self.shared else {
            return;
        };
        if shared.stale == StaleProgress::Suppress && shared.token.is_cancelled() {
            return;
        }
        (shared.forward)(progress);
    }
}

impl<P> Clone for ProgressSink<P> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}
