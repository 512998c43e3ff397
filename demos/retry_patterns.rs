//! Retry Patterns Example
//!
//! Demonstrates driving flaky operations with a retry handler:
//! - Counting strategy with the default Fibonacci intervals
//! - Custom interval functions
//! - Conditional retry through an error predicate
//! - Progress events (retrying / retried)
//! - Cooperative cancellation
//!
//! Run with: cargo run --example retry_patterns

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use steadfast::prelude::*;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
enum ApiError {
    Unavailable,
    Unauthorized,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "service unavailable"),
            Self::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

// ==================== Basic Recovery ====================

/// Example 1: An operation that fails transiently, then recovers.
async fn example_basic_recovery() {
    println!("\n=== Example 1: Basic Recovery ===");

    let calls = Arc::new(AtomicU32::new(0));
    let mut handler = RetryHandler::of_fn(
        {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                println!("  attempt {}", n);
                if n < 3 {
                    Err(ApiError::Unavailable)
                } else {
                    Ok("fresh data")
                }
            }
        },
        |err: &ApiError| matches!(err, ApiError::Unavailable),
        CountingStrategy::with_intervals(5, |_| Duration::from_millis(100)).unwrap(),
    );

    match handler.handle().await {
        Ok(value) => println!("recovered with: {}", value),
        Err(err) => println!("gave up: {}", err),
    }
}

// ==================== Error Classification ====================

/// Example 2: Non-retryable errors propagate immediately.
async fn example_error_classification() {
    println!("\n=== Example 2: Error Classification ===");

    let mut handler = RetryHandler::of_fn(
        || Err::<(), _>(ApiError::Unauthorized),
        |err: &ApiError| matches!(err, ApiError::Unavailable),
        CountingStrategy::default(),
    );

    match handler.handle().await {
        Ok(()) => println!("unexpected success"),
        Err(err) => println!("failed without retrying: {}", err),
    }
}

// ==================== Progress Events ====================

/// Example 3: Watching a retry sequence from the outside.
async fn example_progress_events() {
    println!("\n=== Example 3: Progress Events ===");

    let mut handler = RetryHandler::of_fn(
        || Err::<(), _>(ApiError::Unavailable),
        |_err: &ApiError| true,
        CountingStrategy::with_intervals(3, |_| Duration::from_millis(50)).unwrap(),
    );

    let mut retrying = handler.on_retrying();
    let mut retried = handler.on_retried();
    let watcher = tokio::spawn(async move {
        while let Ok(attempt) = retrying.recv().await {
            println!("  retrying, attempt {}", attempt);
        }
        if let Ok(recovered) = retried.recv().await {
            println!("  sequence over, recovered: {}", recovered);
        }
    });

    let _ = handler.handle().await;
    handler.close();
    let _ = watcher.await;
}

// ==================== Cancellation ====================

/// Example 4: Stopping a retry sequence from the outside.
async fn example_cancellation() {
    println!("\n=== Example 4: Cancellation ===");

    let token = CancellationToken::new();
    let mut handler = RetryHandler::of_fn(
        || Err::<(), _>(ApiError::Unavailable),
        |_err: &ApiError| true,
        CountingStrategy::with_intervals(100, |_| Duration::from_secs(3600)).unwrap(),
    )
    .with_cancellation(token.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        println!("  cancelling from another task");
        token.cancel();
    });

    match handler.handle().await {
        Err(err) if err.is_canceled() => println!("stopped: {}", err),
        other => println!("unexpected outcome: {:?}", other.is_ok()),
    }
}

#[tokio::main]
async fn main() {
    example_basic_recovery().await;
    example_error_classification().await;
    example_progress_events().await;
    example_cancellation().await;
}
