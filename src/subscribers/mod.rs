//! # Event subscribers for runner observability.
//!
//! This module provides the [`Subscribe`] trait, the mutable
//! [`SubscriberSet`] behind a runner's register/unregister surface, and
//! closure-backed adapters for the common one-hook cases.
//!
//! ## Event flow
//! ```text
//! run-loop ── relay ──► Dispatcher ──► Subscribe::on_progress()
//!                                  ──► Subscribe::on_completed()
//!                                  ──► Subscribe::on_failed()
//! ```
//!
//! ## Implementing custom subscribers
//! ```
//! use async_trait::async_trait;
//! use supersede::Subscribe;
//!
//! struct ResultPane;
//!
//! #[async_trait]
//! impl Subscribe<Vec<String>> for ResultPane {
//!     async fn on_completed(&self, rows: &Vec<String>) {
//!         // repaint with the authoritative rows
//!         let _ = rows;
//!     }
//! }
//! ```

mod fn_sub;
mod set;
mod subscribe;

pub use fn_sub::{OnCompleted, OnFailed, OnProgress};
pub use set::{SubscriberSet, SubscriptionId};
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
mod printer;
#[cfg(feature = "logging")]
pub use printer::EventPrinter;
