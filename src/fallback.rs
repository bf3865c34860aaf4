//! Fallback racing across redundant providers.
//!
//! Both combinators take closures rather than ready futures so they control
//! when each attempt starts: [`try_sequential`] never starts an operation
//! it does not need, [`try_parallel`] starts everything up front.

use futures::future::join_all;
use std::future::Future;

/// Invoke operations one at a time, in order, returning the first success.
///
/// A failing operation's error is collected and the next operation starts
/// only after the previous one settled; attempts never overlap. On the
/// first success the remaining operations are never invoked. If every
/// operation fails, the errors are returned in attempted order.
pub async fn try_sequential<T, E, F, Fut>(operations: Vec<F>) -> Result<T, Vec<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut errors = Vec::with_capacity(operations.len());
    for (index, operation) in operations.into_iter().enumerate() {
        match operation().await {
            Ok(value) => {
                tracing::debug!(index, "sequential fallback succeeded");
                return Ok(value);
            }
            Err(err) => {
                tracing::debug!(index, "sequential fallback attempt failed");
                errors.push(err);
            }
        }
    }
    Err(errors)
}

/// Start every operation at once, await them all, and return the first
/// success in array order.
///
/// This deliberately pays the full latency and resource cost of every
/// operation before selecting a winner: nothing is cancelled when an early
/// element succeeds, and result selection re-imposes array order no matter
/// which operation completed first. If none succeeded, every error is
/// returned in array order.
pub async fn try_parallel<T, E, F, Fut>(operations: Vec<F>) -> Result<T, Vec<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started: Vec<Fut> = operations.into_iter().map(|operation| operation()).collect();
    let results = join_all(started).await;

    let mut errors = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => {
                tracing::debug!(index, "parallel fallback succeeded");
                return Ok(value);
            }
            Err(err) => errors.push(err),
        }
    }
    Err(errors)
}
