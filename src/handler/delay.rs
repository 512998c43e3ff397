//! Cancellable wait between attempts.
//!
//! The retry loop sequences attempts; it does not keep time itself. Waiting
//! is delegated to [`tokio::time::sleep`], raced against a
//! [`CancellationToken`] so a cancelled handler stops waiting immediately.

use std::fmt;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// The cancellation cause carried by
/// [`RetryError::Canceled`](crate::RetryError::Canceled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayCanceled;

impl fmt::Display for DelayCanceled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the inter-attempt delay was canceled")
    }
}

impl std::error::Error for DelayCanceled {}

/// Waits for `interval`, returning early with [`DelayCanceled`] if the
/// token is cancelled first. An already-cancelled token never waits.
pub(crate) async fn wait(
    interval: Duration,
    cancellation: &CancellationToken,
) -> Result<(), DelayCanceled> {
    tokio::select! {
        biased;
        () = cancellation.cancelled() => Err(DelayCanceled),
        () = time::sleep(interval) => Ok(()),
    }
}
