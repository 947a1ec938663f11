//! Error types for the feedback engine
//!
//! This module provides structured error definitions using thiserror,
//! with anyhow used for propagation at the binary boundary.

use thiserror::Error;

/// Main error type for feedback engine operations
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Malformed submission or query input; never reaches storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// Durability or connectivity failure in the feedback store
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for feedback engine operations
pub type Result<T> = std::result::Result<T, FeedbackError>;

/// Convert anyhow::Error to FeedbackError
impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeedbackError::Validation("message required".to_string());
        assert_eq!(err.to_string(), "Validation error: message required");

        let err = FeedbackError::Storage("disk unavailable".to_string());
        assert_eq!(err.to_string(), "Storage error: disk unavailable");
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: FeedbackError = anyhow::anyhow!("something broke").into();
        assert!(matches!(err, FeedbackError::Other(_)));
        assert_eq!(err.to_string(), "something broke");
    }
}
