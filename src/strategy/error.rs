//! Error types for strategy construction.

use std::fmt;

/// Error returned when a strategy is constructed with out-of-range
/// parameters.
///
/// # Examples
///
/// ```rust
/// use steadfast::{CountingStrategy, StrategyError};
///
/// assert_eq!(
///     CountingStrategy::new(0).unwrap_err(),
///     StrategyError::ZeroMaxRetries,
/// );
///
/// assert_eq!(
///     CountingStrategy::new(21).unwrap_err(),
///     StrategyError::DefaultIntervalsExceeded { requested: 21 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyError {
    /// `max_retries` was zero; at least one retry must be allowed.
    ZeroMaxRetries,
    /// `max_retries` exceeded the default interval table while no custom
    /// interval function was supplied.
    DefaultIntervalsExceeded {
        /// The `max_retries` value the caller asked for.
        requested: u32,
    },
}

impl fmt::Display for StrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxRetries => write!(f, "max_retries must be 1 or more"),
            Self::DefaultIntervalsExceeded { requested } => write!(
                f,
                "the default interval table holds {} entries, so max_retries must be at most {} \
                 (requested {}); supply a custom interval function to go beyond it",
                super::counting::DEFAULT_INTERVAL_COUNT,
                super::counting::DEFAULT_INTERVAL_COUNT,
                requested
            ),
        }
    }
}

impl std::error::Error for StrategyError {}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_zero_max_retries_display() {
        let display = format!("{}", StrategyError::ZeroMaxRetries);
        assert!(display.contains("1 or more"));
    }

    #[test]
    fn test_default_intervals_exceeded_display() {
        let err = StrategyError::DefaultIntervalsExceeded { requested: 25 };
        let display = format!("{}", err);
        assert!(display.contains("20 entries"));
        assert!(display.contains("requested 25"));
        assert!(display.contains("custom interval function"));
    }
}
