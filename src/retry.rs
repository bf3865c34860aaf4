//! Sequential retry with exponential backoff.

use crate::error::{codes, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::time::Duration;

/// Configuration for [`retry_with_backoff`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total invocations allowed, counting the first attempt.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Factor applied to the delay after each further failure.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry.
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Set the backoff growth factor.
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f64) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    /// Delay after failing attempt `attempt` (1-based):
    /// `base_delay_ms * backoff_multiplier^(attempt - 1)`.
    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::from_millis((self.base_delay_ms as f64 * factor) as u64)
    }
}

/// Invoke `operation` up to `config.max_attempts` times, sleeping between
/// failing attempts with exponentially growing delays.
///
/// The first success returns immediately. No delay follows the final
/// attempt. When every attempt has failed the result is a
/// `MAX_RETRIES_EXCEEDED` error whose details carry the attempt budget and
/// the last observed error (not the full history).
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    config: RetryConfig,
) -> ServiceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut last_error: Option<E> = None;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::debug!(attempt, max_attempts = config.max_attempts, %err, "attempt failed");
                last_error = Some(err);
            }
        }

        if attempt < config.max_attempts {
            let delay = config.delay_after(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
            tokio::time::sleep(delay).await;
        }
    }

    tracing::warn!(max_attempts = config.max_attempts, "retry budget exhausted");
    Err(ServiceError::new(
        codes::MAX_RETRIES_EXCEEDED,
        format!("operation failed after {} attempts", config.max_attempts),
    )
    .with_details(json!({
        "max_attempts": config.max_attempts,
        "last_error": last_error.map(|err| err.to_string()),
    })))
}
