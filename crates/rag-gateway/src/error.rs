//! Error types and the outcome taxonomy for the gateway
//!
//! Failures raised anywhere below the HTTP boundary are plain [`Error`]
//! values. They are classified exactly once, at the boundary, into an
//! [`Outcome`] whose kind and message are stable and transport-independent.

use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationOutcome;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway errors
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was missing
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// An argument was present but malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// The backend rejected our credentials or access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend does not support the requested operation
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// The backend did not answer in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion backend error
    #[error("Provider error: {0}")]
    Provider(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a malformed-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Kind of outcome a failure maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The caller sent something we cannot process
    ClientError,
    /// Credentials or access were rejected
    AuthError,
    /// The backend timed out; the caller may retry
    TimeoutError,
    /// Anything unclassified
    InternalError,
}

/// A classified failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
    /// Individual rule violations (validation failures only)
    pub details: Option<Vec<String>>,
}

impl Outcome {
    fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }
}

pub const INVALID_PARAMETERS: &str = "Invalid request parameters.";
pub const UNAUTHORIZED_ACCESS: &str = "Unauthorized access.";
pub const OPERATION_NOT_SUPPORTED: &str = "Operation not supported.";
pub const REQUEST_TIMEOUT: &str = "Request timeout. Please try again.";
pub const INTERNAL_FAILURE: &str = "An error occurred while processing your request.";

/// Classify a failure raised while serving `context`
///
/// The failure is logged before the outcome is returned. Internal details
/// never leak into the message of an `InternalError` outcome.
pub fn classify(error: &Error, context: &str) -> Outcome {
    tracing::error!("Error in {}: {}", context, error);

    match error {
        Error::MissingArgument(_) => Outcome::new(OutcomeKind::ClientError, INVALID_PARAMETERS),
        Error::InvalidArgument(message) => Outcome::new(OutcomeKind::ClientError, message.clone()),
        Error::Unauthorized(_) => Outcome::new(OutcomeKind::AuthError, UNAUTHORIZED_ACCESS),
        Error::Unsupported(_) => Outcome::new(OutcomeKind::ClientError, OPERATION_NOT_SUPPORTED),
        Error::Timeout(_) => Outcome::new(OutcomeKind::TimeoutError, REQUEST_TIMEOUT),
        Error::Http(err) if err.is_timeout() => {
            Outcome::new(OutcomeKind::TimeoutError, REQUEST_TIMEOUT)
        }
        _ => Outcome::new(OutcomeKind::InternalError, INTERNAL_FAILURE),
    }
}

/// Classify a failed validation
pub fn classify_validation(outcome: &ValidationOutcome) -> Outcome {
    tracing::warn!("Validation failed: {}", outcome.errors.join(", "));

    Outcome {
        kind: OutcomeKind::ClientError,
        message: outcome.primary_message.clone(),
        details: Some(outcome.errors.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_is_generic_client_error() {
        let outcome = classify(&Error::MissingArgument("parameter".into()), "Test context");
        assert_eq!(outcome.kind, OutcomeKind::ClientError);
        assert_eq!(outcome.message, "Invalid request parameters.");
    }

    #[test]
    fn test_invalid_argument_keeps_message() {
        let outcome = classify(&Error::invalid_argument("Bad image format"), "Test context");
        assert_eq!(outcome.kind, OutcomeKind::ClientError);
        assert_eq!(outcome.message, "Bad image format");
    }

    #[test]
    fn test_unauthorized() {
        let outcome = classify(&Error::Unauthorized("Unauthorized".into()), "Test context");
        assert_eq!(outcome.kind, OutcomeKind::AuthError);
        assert_eq!(outcome.message, "Unauthorized access.");
    }

    #[test]
    fn test_unsupported_and_timeout() {
        let outcome = classify(&Error::Unsupported("vision".into()), "Test context");
        assert_eq!(outcome.kind, OutcomeKind::ClientError);
        assert_eq!(outcome.message, "Operation not supported.");

        let outcome = classify(&Error::Timeout("30s".into()), "Test context");
        assert_eq!(outcome.kind, OutcomeKind::TimeoutError);
        assert_eq!(outcome.message, "Request timeout. Please try again.");
    }

    #[test]
    fn test_everything_else_is_internal() {
        for error in [
            Error::provider("upstream exploded"),
            Error::internal("secret detail"),
            Error::Config("missing key".into()),
        ] {
            let outcome = classify(&error, "Test context");
            assert_eq!(outcome.kind, OutcomeKind::InternalError);
            assert_eq!(outcome.message, INTERNAL_FAILURE);
            assert!(outcome.details.is_none());
        }
    }

    #[test]
    fn test_validation_outcome() {
        let validation = ValidationOutcome {
            valid: false,
            primary_message: "Validation failed".to_string(),
            errors: vec!["Error 1".to_string(), "Error 2".to_string()],
        };

        let outcome = classify_validation(&validation);
        assert_eq!(outcome.kind, OutcomeKind::ClientError);
        assert_eq!(outcome.message, "Validation failed");
        assert_eq!(outcome.details.map(|d| d.len()), Some(2));
    }
}
