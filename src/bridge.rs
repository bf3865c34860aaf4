//! Interop between anyhow-flavored fallible code and [`ServiceResult`]
//! outcomes.
//!
//! Application code that raises dynamic errors (or calls libraries that do)
//! enters the algebra through these functions; each failure is normalized
//! into a [`ServiceError`] with a code identifying which bridge it crossed.
//! The inverse direction needs no function at all: `ServiceError` implements
//! `std::error::Error`, so a `ServiceResult` flows back into `?`-based call
//! sites unchanged.

use crate::error::{codes, ServiceError, ServiceResult};
use serde_json::json;
use std::future::Future;

fn wrapped(code: &'static str, message: &str, err: anyhow::Error) -> ServiceError {
    ServiceError::new(code, message).with_details(json!({
        "original_error": format!("{err:#}"),
    }))
}

/// Await a fallible future, converting its error into a `PROMISE_ERROR`.
///
/// The full error chain is recorded under `details.original_error`.
pub async fn from_future<T, E>(fut: impl Future<Output = Result<T, E>>) -> ServiceResult<T>
where
    E: Into<anyhow::Error>,
{
    fut.await
        .map_err(|err| wrapped(codes::PROMISE_ERROR, "bridged future failed", err.into()))
}

/// Run a synchronous fallible closure, converting its error into a
/// `FUNCTION_ERROR`.
///
/// Call-site arguments live in the closure's captures:
/// `wrap_sync(|| parse_config(&path))`.
pub fn wrap_sync<R>(f: impl FnOnce() -> anyhow::Result<R>) -> ServiceResult<R> {
    f().map_err(|err| wrapped(codes::FUNCTION_ERROR, "wrapped function failed", err))
}

/// Run an asynchronous fallible closure, converting its error into an
/// `ASYNC_FUNCTION_ERROR`.
pub async fn wrap_async<R, Fut>(f: impl FnOnce() -> Fut) -> ServiceResult<R>
where
    Fut: Future<Output = anyhow::Result<R>>,
{
    f().await
        .map_err(|err| wrapped(codes::ASYNC_FUNCTION_ERROR, "wrapped async function failed", err))
}
