//! Outcome algebra and resilience combinators for fallible service
//! operations.
//!
//! Failures are values here, never control flow: every combinator returns a
//! [`Result`] (usually [`ServiceResult`]) instead of panicking, and the
//! standard `Result` methods (`map`, `and_then`, `is_ok`, `?`) are the
//! transform and chaining layer of the algebra. This crate adds what std
//! does not have: aggregation over batches of outcomes, bridges from
//! anyhow-flavored code, fallback racing across redundant providers, retry
//! with exponential backoff, and timeout wrapping.

pub mod aggregate;
pub mod bridge;
pub mod error;
pub mod fallback;
pub mod retry;
pub mod timeout;

pub use aggregate::{combine, filter_failures, filter_successes, partition, Partitioned};
pub use bridge::{from_future, wrap_async, wrap_sync};
pub use error::{codes, Severity, ServiceError, ServiceResult};
pub use fallback::{try_parallel, try_sequential};
pub use retry::{retry_with_backoff, RetryConfig};
pub use timeout::with_timeout;
