//! Error handling for the IPFS storage client
//!
//! This module defines the error type shared by the storage client,
//! the configuration layer and the workflow controller.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StorageError>;

/// Error types that can occur when storing or retrieving content
#[derive(Error, Debug)]
pub enum StorageError {
    /// The pinning service rejected the upload
    #[error("Upload failed: {message}")]
    UploadError { message: String },

    /// The gateway did not return the requested content
    #[error("Retrieval failed: {message}")]
    RetrievalError { message: String },

    /// A response did not match the expected shape
    #[error("Failed to parse response: {message}")]
    ParseError { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid parameter
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Operation timed out
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// Operation was cancelled
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// Transport-level failure (DNS, connection, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Create a new upload error
    pub fn upload_error(message: impl Into<String>) -> Self {
        StorageError::UploadError {
            message: message.into(),
        }
    }

    /// Create a new retrieval error
    pub fn retrieval_error(message: impl Into<String>) -> Self {
        StorageError::RetrievalError {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        StorageError::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        StorageError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout(operation: impl Into<String>) -> Self {
        StorageError::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a new cancelled error
    pub fn cancelled(operation: impl Into<String>) -> Self {
        StorageError::Cancelled {
            operation: operation.into(),
        }
    }

    /// Classify a transport error raised while running `operation`
    ///
    /// Request timeouts become [`StorageError::Timeout`]; everything else is
    /// kept as the underlying [`reqwest::Error`].
    pub fn from_transport(operation: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorageError::timeout(operation)
        } else {
            StorageError::Http(err)
        }
    }
}
