//! Liveness handler for service monitoring.
//!
//! The relay holds no external connection of its own, so the probe only
//! confirms the HTTP server is responding.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{debug, instrument};

/// Liveness check endpoint.
///
/// Not gated by authentication; designed to be called frequently by
/// orchestration systems and load balancers.
#[instrument(name = "liveness_check")]
pub async fn liveness_check() -> impl IntoResponse {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now(),
        "service": "trackrelay-api"
    });

    (StatusCode::OK, Json(response))
}
