//! Bearer-token authentication gate.
//!
//! Validates the inbound `Authorization` header against the configured
//! shared secret and rejects the request before it reaches the forward
//! handler. Rejection messages are fixed; no internal detail leaks on
//! auth paths.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use trackrelay_core::RelayError;

use crate::AppState;

/// Extracts the token from the Authorization header.
/// Supports Bearer token format: "Bearer <token>"
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Auth-gate rejections, rendered as fixed-message JSON error bodies.
#[derive(Debug)]
pub enum AuthError {
    /// The Authorization header is missing or not a Bearer token.
    MissingToken,
    /// The Bearer token does not match the configured secret.
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, RelayError::Unauthorized),
            Self::InvalidToken => (StatusCode::FORBIDDEN, RelayError::Forbidden),
        };

        (status, Json(serde_json::json!({ "error": error.to_string() }))).into_response()
    }
}

/// Axum middleware that authenticates requests against the configured
/// bearer token.
///
/// On a match the original request passes through unmodified.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // Audit trail: the full inbound request metadata, before any decision.
    tracing::debug!(
        method = %req.method(),
        uri = %req.uri(),
        headers = ?req.headers(),
        "Received inbound request"
    );

    let Some(token) = extract_bearer_token(req.headers()) else {
        tracing::warn!("Unauthorized request - Missing Bearer token");
        return Err(AuthError::MissingToken);
    };

    if token != state.config.ship24_bearer_token {
        tracing::warn!("Forbidden request - Invalid Bearer token");
        return Err(AuthError::InvalidToken);
    }

    tracing::info!("Bearer token validated, forwarding request");
    Ok(next.run(req).await)
}
