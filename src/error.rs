//! Canonical failure payload for the crate's combinators.
//!
//! Every combinator that synthesizes an error of its own (retry exhaustion,
//! timeout expiry, bridge wrapping) produces a [`ServiceError`]. Caller
//! errors of other types pass through the generic combinators unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result alias used when the error type is not otherwise specified.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Machine-readable codes for every error this crate synthesizes itself.
///
/// Callers pattern-match on [`ServiceError::code`] against these constants;
/// there is no hierarchy, each code is a leaf classification.
pub mod codes {
    /// A bridged future resolved to an error (`from_future`).
    pub const PROMISE_ERROR: &str = "PROMISE_ERROR";
    /// A wrapped synchronous closure returned an error (`wrap_sync`).
    pub const FUNCTION_ERROR: &str = "FUNCTION_ERROR";
    /// A wrapped asynchronous closure returned an error (`wrap_async`).
    pub const ASYNC_FUNCTION_ERROR: &str = "ASYNC_FUNCTION_ERROR";
    /// Every attempt of `retry_with_backoff` failed.
    pub const MAX_RETRIES_EXCEEDED: &str = "MAX_RETRIES_EXCEEDED";
    /// The timer won the race in `with_timeout`.
    pub const OPERATION_TIMEOUT: &str = "OPERATION_TIMEOUT";
    /// The operation under `with_timeout` panicked instead of resolving.
    pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";
}

/// Informational severity attached to a [`ServiceError`].
///
/// Severity never changes combinator behavior; it exists so consumers
/// (HTTP handlers, dashboards) can rank failures when rendering them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Structured failure payload: a short code to match on, a human-readable
/// message, optional free-form context, and bookkeeping fields.
///
/// Serializes directly, so an HTTP layer can hand the value to a client
/// without re-shaping it.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ServiceError {
    /// Short machine-readable identifier, e.g. `"OPERATION_TIMEOUT"`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Optional structured context (original error text, attempt counts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Assigned when the error is constructed.
    pub timestamp: DateTime<Utc>,
    /// Informational only.
    pub severity: Severity,
}

impl ServiceError {
    /// Build an error with a server-assigned timestamp and medium severity.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
            severity: Severity::default(),
        }
    }

    /// Attach structured context.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the default severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Whether retrying the failed operation might plausibly succeed.
    ///
    /// Only the timeout-flavored codes qualify; retry exhaustion already
    /// spent its attempts and the wrapping codes say nothing about cause.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.code.as_str(),
            codes::OPERATION_TIMEOUT | codes::TIMEOUT_ERROR
        )
    }
}
