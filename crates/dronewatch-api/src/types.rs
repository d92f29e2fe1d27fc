// Wire types for the dashboard backend.
//
// Field names mirror the backend JSON exactly. Numeric telemetry fields
// may be absent or null on the wire; they deserialize to `None` rather
// than a sentinel value. Timestamps arrive as epoch milliseconds with
// `0` meaning "never observed".

use serde::{Deserialize, Serialize};

/// Envelope for `POST /dashboard/login` and `POST /dashboard/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: AuthData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthData {
    pub id: Option<String>,
    pub token: Option<String>,
}

/// One telemetry reading as reported by a drone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetryData {
    pub speed: Option<f64>,
    pub power: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub person_count: Option<u32>,
}

/// Envelope for `GET /api/dashboard/drone/telemetry/{serial}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryResponse {
    pub data: TelemetryData,
    /// Epoch millis; `0` when the backend has never seen a reading.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
}

/// Detail payload attached to every event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(default)]
    pub message: String,
    /// Still-frame URI captured with the event, or empty.
    #[serde(default)]
    pub image: String,
}

/// Event severity tag emitted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Alert,
    Info,
    Danger,
    Critical,
}

/// One event record: the triggering telemetry plus detail and severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub speed: Option<f64>,
    pub power: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub person_count: Option<u32>,
    #[serde(default)]
    pub event_detail: EventDetail,
    #[serde(rename = "type", default)]
    pub severity: Option<Severity>,
}

/// Envelope for `GET /api/dashboard/drone/event/{serial}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
    pub data: EventData,
    /// Epoch millis; `0` when no event has ever fired for the drone.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
}
