//! Runner configuration.
//!
//! [`Config`] centralizes the behavioral knobs of a runner. There is exactly
//! one today: what to do with progress emitted by an instance that has
//! already been asked to cancel.
//!
//! # Example
//! ```
//! use supersede::{Config, StaleProgress};
//!
//! let mut cfg = Config::default();
//! cfg.stale_progress = StaleProgress::Suppress;
//!
//! assert_eq!(cfg.stale_progress, StaleProgress::Suppress);
//! ```

/// Policy for progress emitted by a superseded or stopped instance.
///
/// A cancellation request only *asks* the running operation to unwind; it may
/// keep emitting progress until it actually returns. This policy decides
/// whether those late emissions still reach subscribers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaleProgress {
    /// Deliver late emissions as usual.
    #[default]
    Deliver,

    /// Drop emissions once the instance's cancellation token is signaled.
    Suppress,
}

/// Configuration for a runner.
///
/// Controls how progress from a cancelled instance is handled.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Whether progress from a cancelled instance still reaches subscribers.
    pub stale_progress: StaleProgress,
}
