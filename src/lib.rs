//! # Steadfast
//!
//! > *"Fall seven times, stand up eight"*
//!
//! A Rust library for pragmatic retry coordination.
//!
//! ## Philosophy
//!
//! **Steadfast** splits retrying into two halves that stay out of each
//! other's way:
//!
//! - **Strategies** decide *whether* to try again and *how long* to wait.
//!   They are small mutable policy objects that know nothing about the
//!   operation or its errors.
//! - **The handler** drives one fallible async operation under a strategy:
//!   it classifies failures with a caller-supplied predicate, waits between
//!   attempts, publishes progress events, and honors cooperative
//!   cancellation while waiting.
//!
//! ## Quick Example
//!
//! ```rust
//! use steadfast::{CountingStrategy, RetryHandler};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let calls = Arc::new(AtomicU32::new(0));
//!
//! // Fails twice, then succeeds.
//! let mut handler = RetryHandler::of_fn(
//!     {
//!         let calls = calls.clone();
//!         move || {
//!             if calls.fetch_add(1, Ordering::SeqCst) < 2 {
//!                 Err("connection refused".to_string())
//!             } else {
//!                 Ok(42)
//!             }
//!         }
//!     },
//!     |_err: &String| true,
//!     CountingStrategy::with_intervals(5, |_| Duration::from_millis(1)).unwrap(),
//! );
//!
//! let result = handler.handle().await.unwrap();
//! assert_eq!(result, 42);
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # });
//! ```
//!
//! ## Progress Events
//!
//! A handler owns two hot broadcast channels: [`RetryHandler::on_retrying`]
//! delivers the 1-based number of each retry attempt as it starts, and
//! [`RetryHandler::on_retried`] delivers a single `bool` once a retry
//! sequence reaches its terminal state (`true` for recovery, `false` for
//! exhaustion). Neither channel fires for a call that never retried.
//!
//! ## Cancellation
//!
//! The handler observes a [`tokio_util::sync::CancellationToken`] while
//! waiting between attempts. A cancelled wait surfaces as
//! [`RetryError::Canceled`], which is distinguishable from an operation
//! failure so callers can tell "gave up" apart from "was told to stop."

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod handler;
pub mod strategy;

// Re-exports
pub use handler::{DelayCanceled, RetryError, RetryHandler};
pub use strategy::{CountingStrategy, NoRetry, RetryStrategy, StrategyError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::handler::{DelayCanceled, RetryError, RetryHandler};
    pub use crate::strategy::{CountingStrategy, NoRetry, RetryStrategy, StrategyError};
}
