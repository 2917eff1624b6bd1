//! # Operation abstractions.
//!
//! This module provides the types an operation author touches:
//! - [`Operation`] - trait for implementing async cancelable operations
//! - [`OpFn`] - function-backed implementation accepting four closure shapes
//! - [`OpRef`] - shared reference to an operation (`Arc<dyn Operation>`)
//! - [`ProgressSink`] - per-instance progress emitter

mod op;
mod op_fn;
mod sink;

pub use op::{OpRef, Operation};
pub use op_fn::{BoxOpFuture, OpFn};
pub use sink::ProgressSink;
