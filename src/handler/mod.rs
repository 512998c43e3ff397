//! Driving a fallible operation under a retry strategy.
//!
//! [`RetryHandler`] binds four collaborators together:
//!
//! - an **operation**: any of the four factory shapes (sync/async,
//!   value-returning or not), normalized internally to one async form;
//! - an **`is_retryable` predicate**: the caller's error classification;
//!   the handler asks a single boolean question per failure and is
//!   otherwise agnostic to the error taxonomy;
//! - a **[`RetryStrategy`]**: owned exclusively by the handler, reset at
//!   the start of every [`handle`](RetryHandler::handle) call;
//! - an optional **[`CancellationToken`]**, observed while waiting between
//!   attempts.
//!
//! One `handle` call runs as a single suspendable task: attempts never
//! overlap, and the only suspension points are the operation itself and the
//! inter-attempt wait.
//!
//! # Progress Events
//!
//! ```rust
//! use steadfast::{CountingStrategy, RetryHandler};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let mut handler = RetryHandler::of_fn(
//!     || Err::<(), _>("no route to host".to_string()),
//!     |_err: &String| true,
//!     CountingStrategy::with_intervals(2, |_| Duration::from_millis(1)).unwrap(),
//! );
//!
//! let mut retrying = handler.on_retrying();
//! let mut retried = handler.on_retried();
//!
//! let outcome = handler.handle().await;
//! assert_eq!(outcome.unwrap_err().into_failure().as_deref(), Some("no route to host"));
//!
//! // Two retries were attempted, then the sequence gave up.
//! assert_eq!(retrying.try_recv(), Ok(1));
//! assert_eq!(retrying.try_recv(), Ok(2));
//! assert_eq!(retried.try_recv(), Ok(false));
//! # });
//! ```

use std::fmt;

use futures::future::BoxFuture;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::strategy::RetryStrategy;

mod delay;
mod error;
mod events;

pub use delay::DelayCanceled;
pub use error::RetryError;

use events::EventChannels;

#[cfg(test)]
mod tests;

type Operation<T, E> = Box<dyn FnMut() -> BoxFuture<'static, Result<T, E>> + Send>;
type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// Re-executes one fallible operation under a [`RetryStrategy`].
///
/// A handler is constructed once via one of the `of_*` factories and may
/// drive the operation any number of times: each
/// [`handle`](RetryHandler::handle) call resets the strategy and runs a
/// fresh retry sequence. Dropping the handler (or calling
/// [`close`](RetryHandler::close)) releases the progress channels.
///
/// # Examples
///
/// ```rust
/// use steadfast::{CountingStrategy, RetryHandler};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// #[derive(Debug)]
/// enum FetchError {
///     Timeout,
///     NotFound,
/// }
///
/// let mut handler = RetryHandler::of_async_fn(
///     || async { Err::<String, _>(FetchError::NotFound) },
///     |err: &FetchError| matches!(err, FetchError::Timeout),
///     CountingStrategy::with_intervals(5, |_| Duration::from_millis(1)).unwrap(),
/// );
///
/// // NotFound is not retryable: the original error comes straight back.
/// let err = handler.handle().await.unwrap_err();
/// assert!(matches!(err.failure(), Some(FetchError::NotFound)));
/// # });
/// ```
pub struct RetryHandler<T, E> {
    run: Operation<T, E>,
    is_retryable: Predicate<E>,
    strategy: Box<dyn RetryStrategy>,
    cancellation: CancellationToken,
    events: EventChannels,
}

impl<T, E> RetryHandler<T, E>
where
    T: Send + 'static,
    E: fmt::Debug + Send + 'static,
{
    /// Create a handler for a synchronous operation returning a value.
    pub fn of_fn<F, S>(
        mut run: F,
        is_retryable: impl Fn(&E) -> bool + Send + Sync + 'static,
        strategy: S,
    ) -> Self
    where
        F: FnMut() -> Result<T, E> + Send + 'static,
        S: RetryStrategy + 'static,
    {
        Self::bind(
            Box::new(move || -> BoxFuture<'static, Result<T, E>> {
                Box::pin(std::future::ready(run()))
            }),
            Box::new(is_retryable),
            Box::new(strategy),
        )
    }

    /// Create a handler for an asynchronous operation returning a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::{NoRetry, RetryHandler};
    ///
    /// # tokio_test::block_on(async {
    /// let mut handler = RetryHandler::of_async_fn(
    ///     || async { Ok::<_, String>("hello") },
    ///     |_err: &String| false,
    ///     NoRetry,
    /// );
    /// assert_eq!(handler.handle().await.unwrap(), "hello");
    /// # });
    /// ```
    pub fn of_async_fn<F, Fut, S>(
        mut run: F,
        is_retryable: impl Fn(&E) -> bool + Send + Sync + 'static,
        strategy: S,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
        S: RetryStrategy + 'static,
    {
        Self::bind(
            Box::new(move || -> BoxFuture<'static, Result<T, E>> { Box::pin(run()) }),
            Box::new(is_retryable),
            Box::new(strategy),
        )
    }

    fn bind(
        run: Operation<T, E>,
        is_retryable: Predicate<E>,
        strategy: Box<dyn RetryStrategy>,
    ) -> Self {
        Self {
            run,
            is_retryable,
            strategy,
            cancellation: CancellationToken::new(),
            events: EventChannels::new(),
        }
    }

    /// Bind a cancellation signal observed while waiting between attempts.
    ///
    /// Without one, the handler waits out every interval in full. A signal
    /// can also be supplied per call via
    /// [`handle_with`](RetryHandler::handle_with).
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Subscribe to retry notifications.
    ///
    /// Each value is the 1-based number of a retry attempt, delivered when
    /// that attempt starts (after its wait interval). Within one `handle`
    /// call the numbers arrive strictly as `1, 2, 3, ...`. Delivery is
    /// best-effort; a slow subscriber loses the oldest events rather than
    /// slowing the loop down.
    pub fn on_retrying(&self) -> broadcast::Receiver<u32> {
        self.events.subscribe_retrying()
    }

    /// Subscribe to retry outcomes.
    ///
    /// Fires at most once per `handle` call, after the last retry
    /// notification and before the call returns: `true` when a retry
    /// sequence recovered, `false` when it exhausted the strategy. A call
    /// that never retried (first-try success, first-try non-retryable
    /// failure) does not fire this channel at all.
    pub fn on_retried(&self) -> broadcast::Receiver<bool> {
        self.events.subscribe_retried()
    }

    /// Drive the operation to a terminal state under the bound
    /// cancellation signal.
    ///
    /// Returns the operation's value, or:
    ///
    /// - [`RetryError::Failed`] carrying the original error unchanged, when
    ///   the failure was not retryable or the strategy ran out of attempts;
    /// - [`RetryError::Canceled`] when the wait between attempts was
    ///   cancelled.
    ///
    /// May be called repeatedly; the strategy is reset each time, so a
    /// fresh call reproduces the same interval sequence.
    pub async fn handle(&mut self) -> Result<T, RetryError<E>> {
        let cancellation = self.cancellation.clone();
        self.run_loop(cancellation).await
    }

    /// Like [`handle`](RetryHandler::handle), but observing `cancellation`
    /// for this call instead of the bound signal.
    pub async fn handle_with(
        &mut self,
        cancellation: CancellationToken,
    ) -> Result<T, RetryError<E>> {
        self.run_loop(cancellation).await
    }

    async fn run_loop(&mut self, cancellation: CancellationToken) -> Result<T, RetryError<E>> {
        let mut retries: u32 = 0;
        self.strategy.reset();
        loop {
            match (self.run)().await {
                Ok(value) => {
                    if retries > 0 {
                        self.events.publish_retried(true);
                    }
                    return Ok(value);
                }
                Err(error) => {
                    tracing::debug!(error = ?error, retries, "attempt failed");
                    if self.strategy.has_next() && (self.is_retryable)(&error) {
                        let interval = self.strategy.next();
                        if let Err(cause) = delay::wait(interval, &cancellation).await {
                            return Err(RetryError::Canceled(cause));
                        }
                        retries += 1;
                        tracing::debug!(
                            retries,
                            interval_ms = interval.as_millis() as u64,
                            "retrying"
                        );
                        self.events.publish_retrying(retries);
                    } else {
                        if retries > 0 {
                            self.events.publish_retried(false);
                        }
                        return Err(RetryError::Failed(error));
                    }
                }
            }
        }
    }

    /// Release the progress channels, detaching every subscriber.
    ///
    /// Idempotent; also runs on drop. Subscriptions taken after closing
    /// observe an already-closed channel.
    pub fn close(&mut self) {
        self.events.close();
    }
}

impl<E> RetryHandler<(), E>
where
    E: fmt::Debug + Send + 'static,
{
    /// Create a handler for a synchronous operation with no return value.
    pub fn of_action<F, S>(
        run: F,
        is_retryable: impl Fn(&E) -> bool + Send + Sync + 'static,
        strategy: S,
    ) -> Self
    where
        F: FnMut() -> Result<(), E> + Send + 'static,
        S: RetryStrategy + 'static,
    {
        Self::of_fn(run, is_retryable, strategy)
    }

    /// Create a handler for an asynchronous operation with no return value.
    pub fn of_async_action<F, Fut, S>(
        run: F,
        is_retryable: impl Fn(&E) -> bool + Send + Sync + 'static,
        strategy: S,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), E>> + Send + 'static,
        S: RetryStrategy + 'static,
    {
        Self::of_async_fn(run, is_retryable, strategy)
    }
}

impl<T, E> fmt::Debug for RetryHandler<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryHandler")
            .field("closed", &self.events.is_closed())
            .finish_non_exhaustive()
    }
}

impl<T, E> Drop for RetryHandler<T, E> {
    fn drop(&mut self) {
        self.events.close();
    }
}
