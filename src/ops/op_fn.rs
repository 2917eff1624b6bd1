//! # Function-backed operation (`OpFn`)
//!
//! [`OpFn`] wraps a closure `F: Fn(..) -> Fut`, producing a fresh future per
//! operation instance. Four closure shapes are accepted and all normalize to
//! the full `(input, progress, token)` signature internally; a capability
//! the closure does not take is simply unused:
//!
//! - [`OpFn::new`] — `Fn(I, ProgressSink<P>, CancellationToken)`
//! - [`OpFn::with_progress`] — `Fn(I, ProgressSink<P>)`
//! - [`OpFn::cancellable`] — `Fn(I, CancellationToken)`
//! - [`OpFn::plain`] — `Fn(I)`
//!
//! ## Example
//! ```
//! use tokio_util::sync::CancellationToken;
//! use supersede::{OpError, OpFn};
//!
//! let op: OpFn<u64, u64> = OpFn::cancellable(|n: u64, ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(OpError::Canceled);
//!     }
//!     Ok(n * 2)
//! });
//! # let _ = op;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::OpError;
use crate::ops::op::{OpRef, Operation};
use crate::ops::sink::ProgressSink;

/// Boxed future returned by one operation instance.
pub type BoxOpFuture<O> = Pin<Box<dyn Future<Output = Result<O, OpError>> + Send>>;

type OpClosure<I, O, P> =
    Box<dyn Fn(I, ProgressSink<P>, CancellationToken) -> BoxOpFuture<O> + Send + Sync>;

/// Function-backed operation implementation.
///
/// Wraps a closure that *creates* a new future per instance, so restarts
/// never share mutable state. If shared state is needed, capture an
/// `Arc<...>` explicitly inside the closure.
pub struct OpFn<I, O, P = ()> {
    f: OpClosure<I, O, P>,
}

impl<I, O, P> OpFn<I, O, P>
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    /// Creates an operation from the full-shape closure
    /// `(input, progress, token)`.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(I, ProgressSink<P>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, OpError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |input, progress, ctx| Box::pin(f(input, progress, ctx))),
        }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc<F, Fut>(f: F) -> OpRef<I, O, P>
    where
        F: Fn(I, ProgressSink<P>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, OpError>> + Send + 'static,
    {
        Arc::new(Self::new(f))
    }

    /// Creates an operation from a `(input, progress)` closure.
    ///
    /// The instance's cancellation token is not observed by the closure;
    /// such an operation always runs to completion once started.
    pub fn with_progress<F, Fut>(f: F) -> Self
    where
        F: Fn(I, ProgressSink<P>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, OpError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |input, progress, _ctx| Box::pin(f(input, progress))),
        }
    }

    /// Creates an operation from a `(input, token)` closure.
    pub fn cancellable<F, Fut>(f: F) -> Self
    where
        F: Fn(I, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, OpError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |input, _progress, ctx| Box::pin(f(input, ctx))),
        }
    }

    /// Creates an operation from an input-only closure.
    ///
    /// Neither progress nor cancellation is observed; the runner still
    /// coalesces restarts, it just cannot interrupt a running instance.
    pub fn plain<F, Fut>(f: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, OpError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |input, _progress, _ctx| Box::pin(f(input))),
        }
    }
}

#[async_trait]
impl<I, O, P> Operation<I, O, P> for OpFn<I, O, P>
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    async fn run(
        &self,
        input: I,
        progress: ProgressSink<P>,
        ctx: CancellationToken,
    ) -> Result<O, OpError> {
        (self.f)(input, progress, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_shape_ignores_capabilities() {
        let op: OpFn<u32, u32> = OpFn::plain(|n| async move { Ok(n + 1) });
        let out = op
            .run(4, ProgressSink::detached(), CancellationToken::new())
            .await;
        assert_eq!(out.unwrap(), 5);
    }

    #[tokio::test]
    async fn cancellable_shape_sees_the_token() {
        let op: OpFn<u32, u32> = OpFn::cancellable(|n, ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(OpError::Canceled);
            }
            Ok(n)
        });

        let token = CancellationToken::new();
        token.cancel();
        let out = op.run(7, ProgressSink::detached(), token).await;
        assert!(matches!(out, Err(OpError::Canceled)));
    }

    #[tokio::test]
    async fn with_progress_shape_reaches_the_sink() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let op: OpFn<u32, u32, u32> =
            OpFn::with_progress(|n, progress: ProgressSink<u32>| async move {
                progress.emit(n);
                progress.emit(n + 1);
                Ok(n)
            });

        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sink = ProgressSink::for_instance(
            Box::new(move |_p| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            CancellationToken::new(),
            crate::config::StaleProgress::Deliver,
        );

        let out = op.run(1, sink, CancellationToken::new()).await;
        assert_eq!(out.unwrap(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn full_shape_gets_everything() {
        let op: OpFn<u32, u32, u32> = OpFn::new(
            |n, progress: ProgressSink<u32>, ctx: CancellationToken| async move {
                progress.emit(n);
                if ctx.is_cancelled() {
                    return Err(OpError::Canceled);
                }
                Ok(n * 10)
            },
        );
        let out = op
            .run(3, ProgressSink::detached(), CancellationToken::new())
            .await;
        assert_eq!(out.unwrap(), 30);
    }
}
