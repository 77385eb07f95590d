//! Integration tests for the bearer-token auth gate.
//!
//! Tests token validation and error responses through HTTP request
//! scenarios, and that authenticated requests reach the inner handler
//! unmodified.

use std::{
    io,
    sync::{Arc, Mutex},
};

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware,
    routing::post,
    Router,
};
use tower::ServiceExt;
use tracing::instrument::WithSubscriber;
use trackrelay_api::{middleware::auth::auth_middleware, AppState, Config};

const TOKEN: &str = "relay-secret-token";

fn test_state() -> AppState {
    let config = Config {
        ship24_bearer_token: TOKEN.to_string(),
        appsheet_app_id: "app-123".to_string(),
        appsheet_access_key: "key-456".to_string(),
        ..Config::default()
    };
    AppState::new(config).expect("state build")
}

/// Creates a test app with the auth gate in front of an echo handler.
fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/test", post(echo_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Echoes the request body so tests can verify it passed through unchanged.
async fn echo_handler(body: Body) -> Body {
    body
}

async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.expect("body extraction");
    String::from_utf8_lossy(&bytes).into_owned()
}

#[tokio::test]
async fn request_fails_without_auth_header() {
    let app = create_test_app(test_state());

    let request =
        Request::builder().method("POST").uri("/test").body(Body::empty()).expect("request build");

    let response = app.oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_string(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["error"], "Unauthorized - No Bearer Token");
}

#[tokio::test]
async fn request_fails_without_bearer_prefix() {
    let app = create_test_app(test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/test")
        .header(AUTHORIZATION, TOKEN)
        .body(Body::empty())
        .expect("request build");

    let response = app.oneshot(request).await.expect("request execution");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn request_fails_with_wrong_scheme() {
    let app = create_test_app(test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/test")
        .header(AUTHORIZATION, "Basic dGVzdDp0ZXN0")
        .body(Body::empty())
        .expect("request build");

    let response = app.oneshot(request).await.expect("request execution");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn request_fails_with_wrong_token() {
    let app = create_test_app(test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/test")
        .header(AUTHORIZATION, "Bearer not-the-secret")
        .body(Body::empty())
        .expect("request build");

    let response = app.oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_string(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["error"], "Forbidden - Invalid Bearer Token");
}

/// Captures formatted log output for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn inbound_request_is_logged_for_audit() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .finish();

    let app = create_test_app(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/test")
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header("x-webhook-source", "carrier-tracking")
        .body(Body::from("{}"))
        .expect("request build");

    let response =
        app.oneshot(request).with_subscriber(subscriber).await.expect("request execution");
    assert_eq!(response.status(), StatusCode::OK);

    // The gate records the full request metadata before deciding.
    let contents = logs.contents();
    assert!(contents.contains("Received inbound request"));
    assert!(contents.contains("/test"));
    assert!(contents.contains("x-webhook-source"));
    assert!(contents.contains("carrier-tracking"));
}

#[tokio::test]
async fn valid_token_passes_request_through_unmodified() {
    let app = create_test_app(test_state());
    let payload = r#"{"trackings":[{"events":[{"statusCode":"DE"}]}]}"#;

    let request = Request::builder()
        .method("POST")
        .uri("/test")
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(payload))
        .expect("request build");

    let response = app.oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response.into_body()).await, payload);
}
