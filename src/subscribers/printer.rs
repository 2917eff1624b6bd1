//! # EventPrinter — simple event printer
//!
//! A minimal subscriber that prints incoming events to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [progress] 25
//! [progress] 80
//! [completed] 300
//! [failed] operation failed: index unavailable
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::OpError;
use crate::subscribers::subscribe::Subscribe;

/// Event printer subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event lines to
/// stdout for debugging and demonstration purposes. Not intended for
/// production use - implement a custom [`Subscribe`] for structured
/// logging or metrics collection.
#[derive(Default)]
pub struct EventPrinter;

impl EventPrinter {
    /// Constructs a new [`EventPrinter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<O, P> Subscribe<O, P> for EventPrinter
where
    O: Debug + Send + Sync + 'static,
    P: Debug + Send + Sync + 'static,
{
    async fn on_progress(&self, progress: &P) {
        println!("[progress] {progress:?}");
    }

    async fn on_completed(&self, output: &O) {
        println!("[completed] {output:?}");
    }

    async fn on_failed(&self, error: &OpError) {
        println!("[failed] {error}");
    }

    fn name(&self) -> &'static str {
        "event-printer"
    }
}
