//! # Operation abstraction.
//!
//! [`Operation`] is the async, cancelable unit a runner coalesces: one
//! execution per (re)start, bound to one input value and one fresh
//! [`CancellationToken`]. The common handle type is [`OpRef`], an
//! `Arc<dyn Operation>` suitable for sharing with the run-loop task.
//!
//! An operation should periodically check its token (or `select!` on
//! `token.cancelled()`) and return [`OpError::Canceled`] promptly when a
//! newer input supersedes it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::OpError;
use crate::ops::sink::ProgressSink;

/// # Asynchronous, cancelable operation.
///
/// One call to [`run`](Operation::run) is one operation instance. The
/// runner supplies a fresh token per instance and never signals a token
/// that belongs to an instance it has already retired.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use supersede::{OpError, Operation, ProgressSink};
///
/// struct Lookup;
///
/// #[async_trait]
/// impl Operation<String, usize> for Lookup {
///     async fn run(
///         &self,
///         input: String,
///         _progress: ProgressSink<()>,
///         ctx: CancellationToken,
///     ) -> Result<usize, OpError> {
///         if ctx.is_cancelled() {
///             return Err(OpError::Canceled);
///         }
///         Ok(input.len())
///     }
/// }
/// ```
#[async_trait]
pub trait Operation<I, O, P = ()>: Send + Sync + 'static
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    /// Executes one instance against `input` until completion or cancellation.
    ///
    /// Implementations should check `ctx.is_cancelled()` at their own abort
    /// points and return [`OpError::Canceled`] to acknowledge a cancellation
    /// request. Progress may be reported through `progress` at any point
    /// before returning.
    async fn run(
        &self,
        input: I,
        progress: ProgressSink<P>,
        ctx: CancellationToken,
    ) -> Result<O, OpError>;
}

/// Shared handle to an operation (`Arc<dyn Operation>`).
pub type OpRef<I, O, P = ()> = Arc<dyn Operation<I, O, P>>;
