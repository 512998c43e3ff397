//! Count-bounded strategy with Fibonacci default intervals.

use std::fmt;
use std::time::Duration;

use super::error::StrategyError;
use super::RetryStrategy;

/// The first twenty Fibonacci numbers, used as wait intervals in seconds.
///
/// Index 0 is the wait before retry attempt 1.
pub(crate) const FIBONACCI_SECONDS: [u64; 20] = [
    0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987, 1597, 2584, 4181,
];

pub(crate) const DEFAULT_INTERVAL_COUNT: u32 = FIBONACCI_SECONDS.len() as u32;

type IntervalFn = Box<dyn Fn(u32) -> Duration + Send>;

/// A strategy that allows a fixed number of retry attempts.
///
/// Each call to [`next`](RetryStrategy::next) consumes one attempt and asks
/// an interval function for the wait before it. The default interval
/// function reads a 20-entry Fibonacci table in seconds (0s, 1s, 1s, 2s,
/// 3s, 5s, ...), which caps the default configuration at 20 attempts;
/// [`with_intervals`](CountingStrategy::with_intervals) lifts that cap.
///
/// # Examples
///
/// ```rust
/// use steadfast::{CountingStrategy, RetryStrategy};
/// use std::time::Duration;
///
/// // Default Fibonacci intervals.
/// let mut strategy = CountingStrategy::new(4).unwrap();
/// assert_eq!(strategy.next(), Duration::from_secs(0));
/// assert_eq!(strategy.next(), Duration::from_secs(1));
/// assert_eq!(strategy.next(), Duration::from_secs(1));
/// assert_eq!(strategy.next(), Duration::from_secs(2));
/// assert!(!strategy.has_next());
///
/// // Custom intervals: 100ms, 200ms, 300ms, ...
/// let mut strategy =
///     CountingStrategy::with_intervals(30, |attempt| Duration::from_millis(100) * attempt)
///         .unwrap();
/// assert_eq!(strategy.next(), Duration::from_millis(100));
/// assert_eq!(strategy.next(), Duration::from_millis(200));
/// ```
pub struct CountingStrategy {
    max_retries: u32,
    interval: IntervalFn,
    used: u32,
}

impl CountingStrategy {
    /// The number of retries allowed by [`CountingStrategy::default`].
    pub const DEFAULT_MAX_RETRIES: u32 = 12;

    /// Create a strategy allowing `max_retries` attempts with the default
    /// Fibonacci intervals.
    ///
    /// # Errors
    ///
    /// - [`StrategyError::ZeroMaxRetries`] if `max_retries` is zero.
    /// - [`StrategyError::DefaultIntervalsExceeded`] if `max_retries` is
    ///   greater than the 20 entries of the default table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::CountingStrategy;
    ///
    /// assert!(CountingStrategy::new(20).is_ok());
    /// assert!(CountingStrategy::new(21).is_err());
    /// assert!(CountingStrategy::new(0).is_err());
    /// ```
    pub fn new(max_retries: u32) -> Result<Self, StrategyError> {
        if max_retries > DEFAULT_INTERVAL_COUNT {
            return Err(StrategyError::DefaultIntervalsExceeded {
                requested: max_retries,
            });
        }
        Self::with_intervals(max_retries, default_interval)
    }

    /// Create a strategy allowing `max_retries` attempts with a custom
    /// interval function.
    ///
    /// The function receives the 1-based attempt number and returns the
    /// wait before that attempt. Supplying it removes the 20-attempt cap of
    /// the default table.
    ///
    /// # Errors
    ///
    /// [`StrategyError::ZeroMaxRetries`] if `max_retries` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::{CountingStrategy, RetryStrategy};
    /// use std::time::Duration;
    ///
    /// let mut strategy =
    ///     CountingStrategy::with_intervals(100, |_| Duration::from_millis(250)).unwrap();
    /// assert_eq!(strategy.next(), Duration::from_millis(250));
    /// ```
    pub fn with_intervals<F>(max_retries: u32, interval: F) -> Result<Self, StrategyError>
    where
        F: Fn(u32) -> Duration + Send + 'static,
    {
        if max_retries < 1 {
            return Err(StrategyError::ZeroMaxRetries);
        }
        Ok(Self {
            max_retries,
            interval: Box::new(interval),
            used: 0,
        })
    }

    /// The maximum number of retry attempts this strategy schedules.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl Default for CountingStrategy {
    /// A strategy allowing [`DEFAULT_MAX_RETRIES`](Self::DEFAULT_MAX_RETRIES)
    /// attempts with the default Fibonacci intervals.
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            interval: Box::new(default_interval),
            used: 0,
        }
    }
}

impl RetryStrategy for CountingStrategy {
    fn reset(&mut self) {
        self.used = 0;
    }

    fn has_next(&self) -> bool {
        self.used < self.max_retries
    }

    fn next(&mut self) -> Duration {
        assert!(
            self.has_next(),
            "next() called with no retry attempts remaining"
        );
        self.used += 1;
        (self.interval)(self.used)
    }
}

impl fmt::Debug for CountingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingStrategy")
            .field("max_retries", &self.max_retries)
            .field("used", &self.used)
            .finish_non_exhaustive()
    }
}

fn default_interval(attempt: u32) -> Duration {
    Duration::from_secs(FIBONACCI_SECONDS[(attempt - 1) as usize])
}
