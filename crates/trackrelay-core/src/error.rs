//! Error taxonomy for the relay pipeline.
//!
//! Each request stage produces a typed error that the API boundary maps to
//! an HTTP status. Security-sensitive rejections (401/403) carry fixed
//! messages; operational faults (500) carry the stringified cause.

use thiserror::Error;

/// Result type alias using [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;

/// Faults produced by the auth gate and the forward pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Authorization header missing or not a Bearer token.
    #[error("Unauthorized - No Bearer Token")]
    Unauthorized,

    /// Bearer token present but does not match the configured secret.
    #[error("Forbidden - Invalid Bearer Token")]
    Forbidden,

    /// Request body is not decodable JSON.
    #[error("Invalid JSON in request body")]
    InvalidBody,

    /// Any other fault: network failure, malformed structure, or a
    /// downstream rejection.
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    /// HTTP status this error maps to at the API boundary.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::InvalidBody => 400,
            Self::Internal(_) => 500,
        }
    }
}
