//! # Events emitted by a runner toward its subscribers.
//!
//! [`RunEvent`] classifies everything that can come out of the run-loop:
//! - **Progress**: zero or more per operation instance, in emission order
//! - **Completed**: at most one per activation, carrying the authoritative
//!   output for the latest non-superseded input
//! - **Failed**: a genuine operation failure (never fired for cancellation)
//!
//! Events travel through the relay in a single FIFO stream, so the progress
//! of a run is always delivered strictly before that run's completion.

use crate::error::OpError;

/// One event produced by the run-loop.
#[derive(Debug)]
pub enum RunEvent<O, P> {
    /// Progress value emitted by the active (or, depending on the
    /// configured [`StaleProgress`](crate::StaleProgress) policy, a
    /// recently cancelled) operation instance.
    Progress(P),

    /// Final output of the latest input that ran to completion without
    /// being superseded or stopped.
    Completed(O),

    /// Genuine operation failure. Cancellation never surfaces here.
    Failed(OpError),
}

impl<O, P> RunEvent<O, P> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunEvent::Progress(_) => "progress",
            RunEvent::Completed(_) => "completed",
            RunEvent::Failed(_) => "failed",
        }
    }
}
