//! Error types for outbound row-insertion calls.

use thiserror::Error;

/// Result type alias for forwarding operations.
pub type Result<T> = std::result::Result<T, ForwardError>;

/// Failures while forwarding a record to the data-store API.
#[derive(Debug, Clone, Error)]
pub enum ForwardError {
    /// Network-level failure reaching the data-store API.
    #[error("data-store request failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// The data-store API answered with a non-2xx status.
    #[error("data-store rejected row: HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code returned by the data-store API
        status: u16,
        /// Response body content
        body: String,
    },

    /// Invalid client configuration.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl ForwardError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a rejection error from a downstream response.
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected { status, body: body.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}
