//! HTTP request handlers for the trackrelay API.
//!
//! Handlers follow a consistent pattern:
//! - Input validation with typed errors mapped to HTTP status at the
//!   boundary
//! - Tracing for observability
//! - Standardized `{"error": ...}` failure bodies
//!
//! # Handler Organization
//!
//! - `forward` - webhook ingestion and row forwarding
//! - `health` - liveness probe

pub mod forward;
pub mod health;

pub use forward::forward_webhook;
pub use health::liveness_check;
