//! Backoff strategies: when to retry and how long to wait.
//!
//! A strategy answers two questions without knowing anything about the
//! operation being retried or the error it produced:
//!
//! - *Can another attempt still be scheduled?* - [`RetryStrategy::has_next`]
//! - *How long should we wait before it?* - [`RetryStrategy::next`]
//!
//! Strategies are mutable policy objects: each one carries an internal
//! "attempts used" counter that [`RetryStrategy::next`] advances and
//! [`RetryStrategy::reset`] zeroes. A strategy is owned exclusively by one
//! [`RetryHandler`](crate::RetryHandler) and is reset at the start of every
//! `handle` call, so sequential reuse reproduces identical interval
//! sequences. It must never be shared between two in-flight retry sequences.
//!
//! # Provided Strategies
//!
//! - [`CountingStrategy`]: up to `max_retries` attempts, with a
//!   Fibonacci-in-seconds default interval table or a custom interval
//!   function.
//! - [`NoRetry`]: never schedules another attempt.
//!
//! # Quick Start
//!
//! ```rust
//! use steadfast::{CountingStrategy, RetryStrategy};
//! use std::time::Duration;
//!
//! let mut strategy = CountingStrategy::new(3).unwrap();
//!
//! assert!(strategy.has_next());
//! assert_eq!(strategy.next(), Duration::from_secs(0)); // attempt 1: fib(0)
//! assert_eq!(strategy.next(), Duration::from_secs(1)); // attempt 2: fib(1)
//! assert_eq!(strategy.next(), Duration::from_secs(1)); // attempt 3: fib(2)
//! assert!(!strategy.has_next());
//!
//! strategy.reset();
//! assert!(strategy.has_next());
//! ```

use std::time::Duration;

mod counting;
mod error;
mod no_retry;

pub use counting::CountingStrategy;
pub use error::StrategyError;
pub use no_retry::NoRetry;


/// A policy deciding whether to schedule another attempt and how long to
/// wait before it.
///
/// Implementations are stateful: `next` consumes one attempt from an
/// internal counter and `reset` returns the counter to zero. `has_next` is
/// a pure query and may be called any number of times without changing
/// state.
///
/// # Contract
///
/// Callers must gate every `next` call behind `has_next`:
///
/// ```rust
/// use steadfast::{CountingStrategy, RetryStrategy};
///
/// let mut strategy = CountingStrategy::new(2).unwrap();
/// while strategy.has_next() {
///     let wait = strategy.next();
///     // schedule the next attempt after `wait`
///     # let _ = wait;
/// }
/// ```
///
/// Calling `next` when `has_next` is false is a programmer error and
/// panics; it is never surfaced as a recoverable error.
pub trait RetryStrategy: Send {
    /// Returns the internal state to "zero attempts used."
    ///
    /// Idempotent; has no side effects outside the strategy's own state.
    fn reset(&mut self);

    /// Whether another attempt can still be scheduled.
    fn has_next(&self) -> bool;

    /// Consumes one attempt and returns the interval to wait before it.
    ///
    /// The returned interval corresponds to the post-increment attempt
    /// index: the first call after `reset` returns the wait for attempt 1.
    ///
    /// # Panics
    ///
    /// Panics if called when [`has_next`](RetryStrategy::has_next) is
    /// false.
    fn next(&mut self) -> Duration;
}
