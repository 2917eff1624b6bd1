//! Error types used by the coalescing runner and its operations.
//!
//! A single enum, [`OpError`], covers both outcomes a background operation
//! can report besides a normal return:
//!
//! - [`OpError::Canceled`] — the operation observed its cancellation token and
//!   aborted. This is control flow, not a fault: the run-loop treats it as
//!   "no result for this attempt" and may restart against newer input.
//! - [`OpError::Fail`] — a genuine failure. The run-loop never retries it and
//!   never fires the completion event for it; the error is forwarded to the
//!   [`Subscribe::on_failed`](crate::Subscribe::on_failed) hook instead.

use thiserror::Error;

/// # Errors produced by a background operation.
///
/// Operations return `Err(OpError::Canceled)` when they abort in response to
/// their cancellation token, and `Err(OpError::Fail { .. })` for anything
/// that actually went wrong.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum OpError {
    /// Operation aborted after observing a cancellation request.
    #[error("operation canceled")]
    Canceled,

    /// Operation failed for a reason other than cancellation.
    #[error("operation failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl OpError {
    /// Wraps an arbitrary error message into [`OpError::Fail`].
    ///
    /// # Example
    /// ```
    /// use supersede::OpError;
    ///
    /// let err = OpError::fail("index unavailable");
    /// assert!(!err.is_canceled());
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        OpError::Fail {
            error: error.into(),
        }
    }

    /// Returns `true` for the cancellation control-flow signal.
    ///
    /// # Example
    /// ```
    /// use supersede::OpError;
    ///
    /// assert!(OpError::Canceled.is_canceled());
    /// assert!(!OpError::fail("boom").is_canceled());
    /// ```
    pub fn is_canceled(&self) -> bool {
        matches!(self, OpError::Canceled)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use supersede::OpError;
    ///
    /// assert_eq!(OpError::Canceled.as_label(), "op_canceled");
    /// assert_eq!(OpError::fail("boom").as_label(), "op_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            OpError::Canceled => "op_canceled",
            OpError::Fail { .. } => "op_failed",
        }
    }
}
