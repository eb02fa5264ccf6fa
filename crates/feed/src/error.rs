//! Error types for the feed client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Feed client errors
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The payload was not a JSON array of catalogue records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The feed answered with a non-success status
    #[error("Feed error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The feed did not answer in time
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// All retry attempts exhausted
    #[error("All {attempts} attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },
}

impl FeedError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::Json(_)
            | Self::Config(_)
            | Self::MissingEnvVar(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(FeedError::status(503, "unavailable").is_retryable());
        assert!(FeedError::status(429, "slow down").is_retryable());
        assert!(!FeedError::status(404, "gone").is_retryable());
    }

    #[test]
    fn test_timeout_is_retryable() {
        assert!(FeedError::Timeout(Duration::from_secs(1)).is_retryable());
    }

    #[test]
    fn test_bad_payload_not_retryable() {
        let err: FeedError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(!err.is_retryable());
        assert!(!FeedError::config("nope").is_retryable());
    }
}
