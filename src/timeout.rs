//! Timeout racing for a single operation.

use crate::error::{codes, ServiceError, ServiceResult};
use futures::FutureExt;
use serde_json::json;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// Race `operation` against a timer.
///
/// If the operation settles first its own Result passes through unchanged,
/// success or failure. If the timer fires first the result is an
/// `OPERATION_TIMEOUT` error with `details.timeout_ms`, and the losing
/// operation is dropped, cancelling it at its next suspension point
/// rather than leaving it running in the background. An operation that panics
/// instead of resolving to a Result is caught and reported as a
/// `TIMEOUT_ERROR` with the panic payload attached.
pub async fn with_timeout<T>(
    operation: impl Future<Output = ServiceResult<T>>,
    timeout: Duration,
) -> ServiceResult<T> {
    match tokio::time::timeout(timeout, AssertUnwindSafe(operation).catch_unwind()).await {
        Ok(Ok(result)) => result,
        Ok(Err(payload)) => {
            let reason = panic_reason(payload.as_ref());
            tracing::warn!(%reason, "operation panicked while racing the timeout");
            Err(ServiceError::new(
                codes::TIMEOUT_ERROR,
                "operation failed while racing the timeout",
            )
            .with_details(json!({ "original_error": reason })))
        }
        Err(_elapsed) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "operation timed out");
            Err(ServiceError::new(
                codes::OPERATION_TIMEOUT,
                format!("operation timed out after {}ms", timeout.as_millis()),
            )
            .with_details(json!({ "timeout_ms": timeout.as_millis() as u64 })))
        }
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
