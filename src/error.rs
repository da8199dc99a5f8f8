//! Error types and handling for Chargewise
//!
//! This module defines the error types used throughout the application,
//! including the failure taxonomy reported by charger operations. Every
//! variant renders a message that can be shown to the user as-is.

use thiserror::Error;

/// Result type alias for Chargewise operations
pub type Result<T> = std::result::Result<T, ChargewiseError>;

/// Main error type for Chargewise
#[derive(Debug, Error)]
pub enum ChargewiseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Local precondition failed before any request was issued
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Charger address missing; never attempted as a request
    #[error("IP address is empty")]
    EmptyAddress,

    /// Target reachable but the port rejected the connection
    #[error("Connection refused - check IP address and network")]
    ConnectionRefused,

    /// No response within the request timeout
    #[error("Connection timeout - charger not responding")]
    Timeout,

    /// Any other networking failure (DNS, reset, malformed stream)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-200 HTTP status code
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Request succeeded but the charger did not apply the change
    #[error("Device error: {message}")]
    Device { message: String },

    /// Catch-all for failures not anticipated above
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl ChargewiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ChargewiseError::Config {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        ChargewiseError::Serialization {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        ChargewiseError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        ChargewiseError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        ChargewiseError::Network {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http(status: u16) -> Self {
        ChargewiseError::Http { status }
    }

    /// Create a new device-reported failure
    pub fn device<S: Into<String>>(message: S) -> Self {
        ChargewiseError::Device {
            message: message.into(),
        }
    }

    /// Create a new unexpected error
    pub fn unexpected<S: Into<String>>(message: S) -> Self {
        ChargewiseError::Unexpected {
            message: message.into(),
        }
    }

    /// Whether repeating the same request unchanged may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChargewiseError::ConnectionRefused
                | ChargewiseError::Timeout
                | ChargewiseError::Network { .. }
        )
    }
}

impl From<std::io::Error> for ChargewiseError {
    fn from(err: std::io::Error) -> Self {
        ChargewiseError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ChargewiseError {
    fn from(err: serde_yaml::Error) -> Self {
        ChargewiseError::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ChargewiseError {
    fn from(err: serde_json::Error) -> Self {
        ChargewiseError::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ChargewiseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || io_error_kind(&err) == Some(std::io::ErrorKind::TimedOut) {
            return ChargewiseError::Timeout;
        }
        if err.is_connect() {
            if io_error_kind(&err) == Some(std::io::ErrorKind::ConnectionRefused) {
                return ChargewiseError::ConnectionRefused;
            }
            return ChargewiseError::network(err.to_string());
        }
        if err.is_builder() || err.is_request() || err.is_body() || err.is_decode() {
            return ChargewiseError::network(err.to_string());
        }
        ChargewiseError::unexpected(err.to_string())
    }
}

/// Find the innermost I/O error kind in an error's source chain
fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<std::io::ErrorKind> {
    let mut source = err.source();
    let mut kind = None;
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            kind = Some(io.kind());
        }
        source = inner.source();
    }
    kind
}
