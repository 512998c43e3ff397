//! Unit tests for the retry loop.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

use crate::strategy::{CountingStrategy, NoRetry};
use crate::RetryHandler;

fn fail_n_times(
    failures: u32,
    calls: Arc<AtomicU32>,
) -> impl FnMut() -> Result<&'static str, String> + Send + 'static {
    move || {
        if calls.fetch_add(1, Ordering::SeqCst) < failures {
            Err("transient".to_string())
        } else {
            Ok("done")
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_try_success_returns_value() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut handler = RetryHandler::of_fn(
        fail_n_times(0, calls.clone()),
        |_err: &String| true,
        CountingStrategy::default(),
    );

    assert_eq!(handler.handle().await.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_returns_original_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut handler = RetryHandler::of_fn(
        fail_n_times(u32::MAX, calls.clone()),
        |_err: &String| true,
        CountingStrategy::new(2).unwrap(),
    );

    let err = handler.handle().await.unwrap_err();
    assert_eq!(err.into_failure().as_deref(), Some("transient"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_error_fails_fast() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut handler = RetryHandler::of_fn(
        fail_n_times(u32::MAX, calls.clone()),
        |_err: &String| false,
        CountingStrategy::default(),
    );

    let err = handler.handle().await.unwrap_err();
    assert!(err.is_failed());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_retry_strategy_never_waits() {
    let started = tokio::time::Instant::now();
    let mut handler = RetryHandler::of_fn(
        || Err::<(), _>("transient".to_string()),
        |_err: &String| true,
        NoRetry,
    );

    let err = handler.handle().await.unwrap_err();
    assert!(err.is_failed());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_precancelled_token_cancels_first_wait() {
    let token = CancellationToken::new();
    token.cancel();

    let calls = Arc::new(AtomicU32::new(0));
    let mut handler = RetryHandler::of_fn(
        fail_n_times(u32::MAX, calls.clone()),
        |_err: &String| true,
        CountingStrategy::default(),
    )
    .with_cancellation(token);

    let mut retrying = handler.on_retrying();

    let err = handler.handle().await.unwrap_err();
    assert!(err.is_canceled());
    // The first attempt ran; the wait before retry 1 was cancelled.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(retrying.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_handle_with_overrides_bound_token() {
    let bound = CancellationToken::new();
    let override_token = CancellationToken::new();
    override_token.cancel();

    let mut handler = RetryHandler::of_fn(
        || Err::<(), _>("transient".to_string()),
        |_err: &String| true,
        CountingStrategy::default(),
    )
    .with_cancellation(bound);

    let err = handler.handle_with(override_token).await.unwrap_err();
    assert!(err.is_canceled());
}

#[tokio::test(start_paused = true)]
async fn test_async_operation_is_awaited_between_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut handler = RetryHandler::of_async_fn(
        {
            let calls = calls.clone();
            move || {
                let calls = calls.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    if calls.fetch_add(1, Ordering::SeqCst) < 1 {
                        Err("transient".to_string())
                    } else {
                        Ok(7)
                    }
                }
            }
        },
        |_err: &String| true,
        CountingStrategy::new(3).unwrap(),
    );

    assert_eq!(handler.handle().await.unwrap(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_action_factories_normalize_to_unit() {
    let mut handler = RetryHandler::of_action(|| Ok::<(), String>(()), |_err| true, NoRetry);
    handler.handle().await.unwrap();

    let mut handler =
        RetryHandler::of_async_action(|| async { Ok::<(), String>(()) }, |_err| true, NoRetry);
    handler.handle().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_close_is_idempotent_and_detaches_subscribers() {
    let mut handler = RetryHandler::of_fn(
        || Ok::<_, String>(1),
        |_err| true,
        CountingStrategy::default(),
    );

    let mut retrying = handler.on_retrying();
    handler.close();
    handler.close();

    assert_eq!(retrying.try_recv(), Err(TryRecvError::Closed));
    assert_eq!(handler.on_retried().try_recv(), Err(TryRecvError::Closed));

    // The loop still runs after close; events are simply dropped.
    assert_eq!(handler.handle().await.unwrap(), 1);
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_failures_are_logged_at_debug() {
    let mut handler = RetryHandler::of_fn(
        || Err::<(), _>("transient".to_string()),
        |_err: &String| true,
        CountingStrategy::new(1).unwrap(),
    );

    let _ = handler.handle().await;
    assert!(logs_contain("attempt failed"));
    assert!(logs_contain("retrying"));
}
