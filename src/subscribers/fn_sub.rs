//! # Closure-backed subscribers.
//!
//! [`OnCompleted`], [`OnProgress`], and [`OnFailed`] wrap a plain closure
//! into a [`Subscribe`] implementation observing exactly one hook. They
//! cover the common case of "call this function with the result" without
//! a hand-written trait impl.
//!
//! ## Example
//! ```
//! use supersede::OnCompleted;
//!
//! let sub = OnCompleted::arc(|out: &usize| {
//!     println!("latest count: {out}");
//! });
//! # let _ = sub;
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OpError;
use crate::subscribers::subscribe::Subscribe;

/// Subscriber invoking a closure on each completion event.
pub struct OnCompleted<F> {
    f: F,
}

impl<F> OnCompleted<F> {
    /// Wraps the closure and returns it as a shared subscriber handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<O, P, F> Subscribe<O, P> for OnCompleted<F>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(&O) + Send + Sync + 'static,
{
    async fn on_completed(&self, output: &O) {
        (self.f)(output);
    }

    fn name(&self) -> &'static str {
        "on_completed"
    }
}

/// Subscriber invoking a closure on each progress event.
pub struct OnProgress<F> {
    f: F,
}

impl<F> OnProgress<F> {
    /// Wraps the closure and returns it as a shared subscriber handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<O, P, F> Subscribe<O, P> for OnProgress<F>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(&P) + Send + Sync + 'static,
{
    async fn on_progress(&self, progress: &P) {
        (self.f)(progress);
    }

    fn name(&self) -> &'static str {
        "on_progress"
    }
}

/// Subscriber invoking a closure on each failure event.
pub struct OnFailed<F> {
    f: F,
}

impl<F> OnFailed<F> {
    /// Wraps the closure and returns it as a shared subscriber handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<O, P, F> Subscribe<O, P> for OnFailed<F>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(&OpError) + Send + Sync + 'static,
{
    async fn on_failed(&self, error: &OpError) {
        (self.f)(error);
    }

    fn name(&self) -> &'static str {
        "on_failed"
    }
}
