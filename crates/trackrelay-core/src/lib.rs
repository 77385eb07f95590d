//! Core domain models and error handling for the tracking-webhook relay.
//!
//! Defines the inbound carrier-tracking payload schema, the extracted-record
//! mapping, the outbound row-insertion payload, and the service error
//! taxonomy. The API and forwarding crates depend on these foundational
//! types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;

pub use error::{RelayError, Result};
pub use models::{ExtractedRecord, Row, RowPayload, Tracking, TrackingEvent, TrackingWebhook};
