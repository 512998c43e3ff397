//! Terminal errors for a retry sequence.

use std::fmt;

use super::delay::DelayCanceled;

/// Error returned when a retry sequence ends without a success.
///
/// A sequence can end two ways, and callers need to tell them apart:
///
/// - [`Failed`](RetryError::Failed): the operation failed and no further
///   attempt was made, either because the error was not retryable or
///   because the strategy ran out of attempts. The original error is
///   carried unchanged.
/// - [`Canceled`](RetryError::Canceled): the wait between attempts was
///   interrupted by the cancellation signal. The operation's last error is
///   *not* the terminal outcome here; the caller asked the loop to stop.
///
/// # Examples
///
/// ```rust
/// use steadfast::{NoRetry, RetryError, RetryHandler};
///
/// # tokio_test::block_on(async {
/// let mut handler = RetryHandler::of_fn(
///     || Err::<i32, _>("boom".to_string()),
///     |_err: &String| true,
///     NoRetry,
/// );
///
/// match handler.handle().await {
///     Err(RetryError::Failed(e)) => assert_eq!(e, "boom"),
///     other => panic!("expected the original error, got {:?}", other),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation failed and no further attempt was made; carries the
    /// original error unchanged.
    Failed(E),
    /// The retry sequence was canceled while waiting between attempts.
    Canceled(DelayCanceled),
}

impl<E> RetryError<E> {
    /// Returns true if the sequence ended with an operation failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if the sequence was canceled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled(_))
    }

    /// Get the original operation error if present.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Canceled(_) => None,
        }
    }

    /// Extract the original operation error if present.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Canceled(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "{}", e),
            Self::Canceled(_) => write!(f, "the retry was canceled"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Canceled(cause) => Some(cause),
        }
    }
}
