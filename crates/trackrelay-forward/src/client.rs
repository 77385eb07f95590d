//! HTTP client for the data-store row-insertion API.
//!
//! Handles request construction, response capture, and error categorization.
//! The caller decides how to react to a non-2xx outcome; this client records
//! the response either way.

use std::time::Duration;

use serde::Serialize;
use trackrelay_core::{ExtractedRecord, RowPayload};
use tracing::{info_span, Instrument};

use crate::error::{ForwardError, Result};

/// Configuration for the data-store client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the data-store API.
    pub base_url: String,
    /// Application identifier in the data-store API path.
    pub app_id: String,
    /// Access-key credential sent with every request.
    pub access_key: String,
    /// Target table in the data-store API path.
    pub table: String,
    /// Timeout for each HTTP request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.appsheet.com".to_string(),
            app_id: String::new(),
            access_key: String::new(),
            table: "t0633".to_string(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECONDS),
            user_agent: "Trackrelay-Forward/1.0".to_string(),
        }
    }
}

/// Client that inserts extracted tracking records as data-store rows.
#[derive(Debug, Clone)]
pub struct DataStoreClient {
    client: reqwest::Client,
    config: ClientConfig,
}

/// Captured result of one row-insertion POST.
///
/// Recorded in processing order and echoed back to the webhook caller as
/// `appsheet_responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardOutcome {
    /// HTTP status code returned by the data-store API.
    pub status_code: u16,
    /// Parsed response body, or the raw text as a JSON string when the
    /// response is not valid JSON.
    pub response_body: serde_json::Value,
}

impl ForwardOutcome {
    /// Whether the downstream call succeeded (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Converts a non-2xx outcome into a [`ForwardError::Rejected`].
    ///
    /// Mirrors the abort-on-first-failure pipeline edge: the outcome is
    /// recorded first, then raised.
    pub fn error_for_status(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ForwardError::rejected(self.status_code, self.response_body.to_string()))
        }
    }
}

impl DataStoreClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ForwardError::Configuration` if required settings are empty
    /// or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ForwardError::configuration("base_url must not be empty"));
        }
        if config.app_id.is_empty() {
            return Err(ForwardError::configuration("app_id must not be empty"));
        }
        if config.access_key.is_empty() {
            return Err(ForwardError::configuration("access_key must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ForwardError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// URL of the row-insertion action endpoint.
    fn action_url(&self) -> String {
        format!(
            "{}/api/v2/apps/{}/tables/{}/Action",
            self.config.base_url.trim_end_matches('/'),
            self.config.app_id,
            self.config.table
        )
    }

    /// Inserts one extracted record as a data-store row.
    ///
    /// Returns the captured response for any status code; the caller checks
    /// [`ForwardOutcome::error_for_status`] to abort on rejection.
    ///
    /// # Errors
    ///
    /// Returns `ForwardError::Network` when the request cannot be sent or
    /// the response cannot be read.
    pub async fn insert_row(&self, record: &ExtractedRecord) -> Result<ForwardOutcome> {
        let payload = RowPayload::for_record(record);
        let url = self.action_url();

        let span = info_span!(
            "insert_row",
            tracking_number = record.tracking_number.as_deref().unwrap_or(""),
            url = %url,
        );

        async move {
            tracing::debug!(payload = ?payload, "Sending row-insertion request");

            let response = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .header("ApplicationAccessKey", &self.config.access_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!("Row-insertion request failed: {}", e);
                    ForwardError::network(e.to_string())
                })?;

            let status_code = response.status().as_u16();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ForwardError::network(format!("failed to read response: {e}")))?;

            let response_body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });

            let outcome = ForwardOutcome { status_code, response_body };

            if outcome.is_success() {
                tracing::info!(status = status_code, "Row inserted");
            } else {
                tracing::warn!(status = status_code, "Data-store rejected row");
            }

            Ok(outcome)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use trackrelay_core::TrackingEvent;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sample_record() -> ExtractedRecord {
        ExtractedRecord::from(&TrackingEvent {
            status_code: Some("DE".to_string()),
            status: Some("Delivered".to_string()),
            tracking_number: Some("T1".to_string()),
            occurrence_datetime: Some("2024-01-01T00:00:00Z".to_string()),
            status_milestone: Some("delivered".to_string()),
        })
    }

    fn test_client(base_url: String) -> DataStoreClient {
        DataStoreClient::new(ClientConfig {
            base_url,
            app_id: "app-123".to_string(),
            access_key: "key-456".to_string(),
            ..ClientConfig::default()
        })
        .expect("client build")
    }

    #[tokio::test]
    async fn successful_insertion() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/api/v2/apps/app-123/tables/t0633/Action"))
            .and(matchers::header("ApplicationAccessKey", "key-456"))
            .and(matchers::header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Rows": [{"tracking_id": "T1"}]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let outcome = client.insert_row(&sample_record()).await.expect("insertion");

        assert_eq!(outcome.status_code, 200);
        assert!(outcome.is_success());
        assert!(outcome.error_for_status().is_ok());
        assert_eq!(outcome.response_body["Rows"][0]["tracking_id"], "T1");
    }

    #[tokio::test]
    async fn row_payload_sent_as_specified() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::body_json(serde_json::json!({
                "Action": "Add",
                "Properties": {"Locale": "en-US"},
                "Rows": [{
                    "tracking_id": "T1",
                    "status_code": "DE",
                    "status_cmb": "Delivered",
                    "status_milestone": "delivered",
                    "status_ts": "2024-01-01T00:00:00Z"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let outcome = client.insert_row(&sample_record()).await.expect("insertion");
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn rejection_recorded_before_raised() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "bad row"})),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let outcome = client.insert_row(&sample_record()).await.expect("response captured");

        assert_eq!(outcome.status_code, 422);
        assert!(!outcome.is_success());
        assert_eq!(outcome.response_body["message"], "bad row");

        let err = outcome.error_for_status().expect_err("rejection");
        assert!(err.to_string().contains("422"));
    }

    #[tokio::test]
    async fn non_json_response_body_captured_as_string() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let outcome = client.insert_row(&sample_record()).await.expect("insertion");

        assert_eq!(outcome.response_body, serde_json::Value::String("OK".to_string()));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Port 1 is never listening locally.
        let client = test_client("http://127.0.0.1:1".to_string());

        let err = client.insert_row(&sample_record()).await.expect_err("network failure");
        assert!(matches!(err, ForwardError::Network { .. }));
    }

    #[test]
    fn empty_credentials_rejected_at_build() {
        let err = DataStoreClient::new(ClientConfig::default()).expect_err("missing app_id");
        assert!(matches!(err, ForwardError::Configuration { .. }));
    }
}
