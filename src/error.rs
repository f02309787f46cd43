//! # Client Error Types
//!
//! Errors raised by the client's own plumbing: configuration, local persistence,
//! and construction of the HTTP transport. Failures that come back from the
//! organizer API are [`ParsedError`](crate::classifier::ParsedError) values instead.

use thiserror::Error;

use crate::classifier::ParsedError;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for local client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token store error: {0}")]
    TokenStoreError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] ParsedError),
}

impl ClientError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a token store error
    pub fn token_store_error(message: impl Into<String>) -> Self {
        Self::TokenStoreError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::config_error("bad base url");
        assert_eq!(err.to_string(), "Configuration error: bad base url");

        let err = ClientError::token_store_error("disk full");
        assert_eq!(err.to_string(), "Token store error: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ClientError = io.into();
        assert!(matches!(err, ClientError::IoError(_)));
    }

    #[test]
    fn test_parsed_error_conversion() {
        let parsed = ParsedError::new("RESOURCE_NOT_FOUND", "Task missing");
        let err: ClientError = parsed.into();
        assert_eq!(err.to_string(), "API request failed: RESOURCE_NOT_FOUND: Task missing");
    }
}
