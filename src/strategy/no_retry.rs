//! The strategy that never retries.

use std::time::Duration;

use super::RetryStrategy;

/// A strategy that never schedules another attempt.
///
/// This is the explicit way to run an operation through a
/// [`RetryHandler`](crate::RetryHandler) without retrying: failures
/// propagate after the first attempt.
///
/// ```rust
/// use steadfast::{NoRetry, RetryStrategy};
///
/// assert!(!NoRetry.has_next());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn reset(&mut self) {}

    fn has_next(&self) -> bool {
        false
    }

    /// # Panics
    ///
    /// Always; `NoRetry` has no interval to return.
    fn next(&mut self) -> Duration {
        panic!("unreachable: NoRetry never schedules another attempt")
    }
}

#[cfg(test)]
mod no_retry_tests {
    use super::*;

    #[test]
    fn test_has_next_is_always_false() {
        let mut strategy = NoRetry;
        assert!(!strategy.has_next());
        strategy.reset();
        assert!(!strategy.has_next());
    }

    #[test]
    #[should_panic(expected = "unreachable")]
    fn test_next_panics() {
        let _ = NoRetry.next();
    }
}
