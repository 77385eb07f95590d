//! Webhook forward handler.
//!
//! Parses the authenticated tracking notification, extracts one record per
//! tracking event, forwards each record as a data-store row insertion, and
//! aggregates the downstream responses. The pipeline is linear:
//! Parse -> Extract -> Forward[] -> Aggregate -> Respond, aborting on the
//! first downstream rejection.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use trackrelay_core::{ExtractedRecord, RelayError, TrackingWebhook};
use trackrelay_forward::ForwardOutcome;
use tracing::{debug, error, info, instrument};

use crate::AppState;

/// Response from a fully forwarded webhook.
#[derive(Debug, Serialize)]
pub struct ForwardResponse {
    /// Records extracted from the notification, in document order.
    pub extracted_data: Vec<ExtractedRecord>,
    /// Captured data-store responses, one per record, in the same order.
    pub appsheet_responses: Vec<ForwardOutcome>,
}

/// Receives a tracking notification and forwards its events as rows.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: Request body is not decodable JSON
/// - 500: Network failure, malformed structure, or a downstream non-2xx
///   response (results collected before the failure are discarded)
#[instrument(name = "forward_webhook", skip(state, body))]
pub async fn forward_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    info!(payload_size = body.len(), "Received tracking notification");

    match process(&state, &body).await {
        Ok(response) => {
            info!(
                records = response.extracted_data.len(),
                "All tracking events forwarded"
            );
            (StatusCode::OK, Json(response)).into_response()
        },
        Err(e) => {
            error!(error = %e, "Forwarding failed");
            error_response(&e)
        },
    }
}

/// Runs the parse/extract/forward pipeline for one notification.
async fn process(state: &AppState, body: &Bytes) -> Result<ForwardResponse, RelayError> {
    let payload = decode_payload(body)?;

    let extracted_data = payload.extracted_records();
    debug!(records = extracted_data.len(), "Extracted tracking events");

    let mut appsheet_responses = Vec::with_capacity(extracted_data.len());
    for record in &extracted_data {
        debug!(record = ?record, "Forwarding extracted record");

        let outcome = state
            .forwarder
            .insert_row(record)
            .await
            .map_err(|e| RelayError::Internal(anyhow::anyhow!(e)))?;

        // Recorded before the status check so the rejected response itself
        // is captured, matching the abort-on-first-failure edge.
        let status_check = outcome.error_for_status();
        appsheet_responses.push(outcome);
        status_check.map_err(|e| RelayError::Internal(anyhow::anyhow!(e)))?;
    }

    Ok(ForwardResponse { extracted_data, appsheet_responses })
}

/// Decodes the request body into the tracking payload.
///
/// Accepts the raw notification and both gateway envelope forms, where the
/// JSON object carries the notification as a `body` field holding either
/// string-encoded JSON or an already-structured mapping.
fn decode_payload(body: &Bytes) -> Result<TrackingWebhook, RelayError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| RelayError::InvalidBody)?;

    let payload_value = match value.get("body") {
        Some(serde_json::Value::String(inner)) => {
            debug!("Decoding gateway-envelope body field");
            serde_json::from_str(inner).map_err(|_| RelayError::InvalidBody)?
        },
        Some(serde_json::Value::Object(structured)) => {
            debug!("Using structured gateway-envelope body field");
            serde_json::Value::Object(structured.clone())
        },
        Some(_) => {
            return Err(RelayError::Internal(anyhow::anyhow!(
                "envelope body field must be a JSON string or object"
            )));
        },
        None => value,
    };

    serde_json::from_value(payload_value)
        .map_err(|e| RelayError::Internal(anyhow::anyhow!("invalid webhook structure: {e}")))
}

/// Renders a pipeline error as its HTTP status and `{"error": ...}` body.
fn error_response(error: &RelayError) -> Response {
    let status = StatusCode::from_u16(error.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(serde_json::json!({ "error": error.to_string() }))).into_response()
}
