//! Error types for deckwatch
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for deckwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for deckwatch
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Availability fetch failures
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Status store or observation log errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Notification delivery errors
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Reasons a single availability fetch can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The request did not complete within the provider timeout
    #[error("request timed out")]
    Timeout,

    /// The remote answered with a non-success status
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The body was missing the availability field or could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Connection-level failure (DNS, TLS, reset)
    #[error("transport failure: {0}")]
    Transport(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a notifier error
    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier(msg.into())
    }

    /// Create a malformed-response network error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Network(NetworkError::MalformedResponse(msg.into()))
    }

    /// Create a transport-level network error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Network(NetworkError::Transport(msg.into()))
    }

    /// Whether this error came from the availability fetch
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_render_their_cause() {
        let err = Error::from(NetworkError::HttpStatus(503));
        assert_eq!(err.to_string(), "Network error: HTTP 503");
        assert!(err.is_network());

        let err = Error::from(NetworkError::Timeout);
        assert_eq!(err.to_string(), "Network error: request timed out");
    }

    #[test]
    fn helpers_build_expected_variants() {
        assert!(matches!(Error::config("x"), Error::Config(_)));
        assert!(matches!(Error::persistence("x"), Error::Persistence(_)));
        assert!(matches!(Error::notifier("x"), Error::Notifier(_)));
        assert!(matches!(
            Error::malformed("missing field"),
            Error::Network(NetworkError::MalformedResponse(_))
        ));
        assert!(!Error::notifier("x").is_network());
    }
}
