//! Inbound webhook payload schema and the row-insertion mapping.
//!
//! The carrier-tracking provider delivers a `trackings` array, each entry
//! holding an `events` array of status updates. Every status update maps
//! 1:1 into an [`ExtractedRecord`] (the same five fields with the fixed
//! `_exctd` suffix) and from there into one [`RowPayload`] for the
//! data-store row-insertion API.

use serde::{Deserialize, Serialize};

/// Top-level payload of a carrier-tracking webhook notification.
///
/// Absent or empty `trackings` is valid and yields no records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingWebhook {
    /// Shipments included in this notification.
    #[serde(default)]
    pub trackings: Vec<Tracking>,
}

/// One shipment's tracking history within a webhook notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tracking {
    /// Status updates for this shipment, in document order.
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
}

/// One status update within a shipment's tracking history.
///
/// Every field is optional; a missing field is carried forward as `null`
/// rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    /// Carrier status code, e.g. `DE`.
    pub status_code: Option<String>,
    /// Human-readable status text.
    pub status: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    /// When the status occurred, as reported by the carrier.
    pub occurrence_datetime: Option<String>,
    /// Normalized milestone, e.g. `delivered`.
    pub status_milestone: Option<String>,
}

/// A tracking event's fields renamed with the fixed `_exctd` suffix.
///
/// This is the shape echoed back to the caller in `extracted_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    /// Carrier status code.
    #[serde(rename = "statusCode_exctd")]
    pub status_code: Option<String>,
    /// Human-readable status text.
    #[serde(rename = "status_exctd")]
    pub status: Option<String>,
    /// Carrier tracking number.
    #[serde(rename = "trackingNumber_exctd")]
    pub tracking_number: Option<String>,
    /// When the status occurred.
    #[serde(rename = "occurrenceDatetime_exctd")]
    pub occurrence_datetime: Option<String>,
    /// Normalized milestone.
    #[serde(rename = "statusMilestone_exctd")]
    pub status_milestone: Option<String>,
}

impl From<&TrackingEvent> for ExtractedRecord {
    fn from(event: &TrackingEvent) -> Self {
        Self {
            status_code: event.status_code.clone(),
            status: event.status.clone(),
            tracking_number: event.tracking_number.clone(),
            occurrence_datetime: event.occurrence_datetime.clone(),
            status_milestone: event.status_milestone.clone(),
        }
    }
}

impl TrackingWebhook {
    /// Flattens the payload into extracted records in document order.
    ///
    /// Iterates trackings and their events top to bottom; missing fields
    /// become `None` rather than errors.
    pub fn extracted_records(&self) -> Vec<ExtractedRecord> {
        self.trackings
            .iter()
            .flat_map(|tracking| tracking.events.iter())
            .map(ExtractedRecord::from)
            .collect()
    }
}

/// Request body for the data-store row-insertion API.
///
/// Wraps exactly one extracted record as a single insertable row with the
/// fixed `en-US` locale property.
#[derive(Debug, Clone, Serialize)]
pub struct RowPayload {
    /// Always `Add`.
    #[serde(rename = "Action")]
    pub action: String,
    /// Fixed request properties.
    #[serde(rename = "Properties")]
    pub properties: RowProperties,
    /// The single row to insert.
    #[serde(rename = "Rows")]
    pub rows: Vec<Row>,
}

/// Properties block of a [`RowPayload`].
#[derive(Debug, Clone, Serialize)]
pub struct RowProperties {
    /// Locale applied to the insertion, always `en-US`.
    #[serde(rename = "Locale")]
    pub locale: String,
}

/// One insertable row in the data-store table.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    /// Carrier tracking number.
    pub tracking_id: Option<String>,
    /// Carrier status code.
    pub status_code: Option<String>,
    /// Human-readable status text.
    pub status_cmb: Option<String>,
    /// Normalized milestone.
    pub status_milestone: Option<String>,
    /// When the status occurred.
    pub status_ts: Option<String>,
}

impl RowPayload {
    /// Builds the row-insertion payload for one extracted record.
    pub fn for_record(record: &ExtractedRecord) -> Self {
        Self {
            action: "Add".to_string(),
            properties: RowProperties { locale: "en-US".to_string() },
            rows: vec![Row {
                tracking_id: record.tracking_number.clone(),
                status_code: record.status_code.clone(),
                status_cmb: record.status.clone(),
                status_milestone: record.status_milestone.clone(),
                status_ts: record.occurrence_datetime.clone(),
            }],
        }
    }
}
