// ── Event domain types ──

use serde::{Deserialize, Serialize};

use super::telemetry::TelemetryReading;

/// Severity tag attached to backend events.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EventSeverity {
    Info,
    Alert,
    Danger,
    Critical,
}

/// Human-facing event payload: operator message plus an optional
/// captured still frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDetail {
    pub message: String,
    /// Frame URI, or empty when no capture accompanied the event.
    pub image: String,
}

/// One event record: the telemetry at trigger time plus detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub speed: Option<f64>,
    pub power: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub person_count: Option<u32>,
    pub detail: EventDetail,
    pub severity: Option<EventSeverity>,
}

impl EventRecord {
    /// Placeholder for units that have never raised an event. Carries the
    /// unit's current telemetry so the detail view has numbers to show.
    pub fn standby(reading: &TelemetryReading) -> Self {
        Self {
            speed: reading.speed,
            power: reading.power,
            latitude: reading.latitude,
            longitude: reading.longitude,
            person_count: reading.person_count,
            detail: EventDetail {
                message: "STANDBY".into(),
                image: String::new(),
            },
            severity: None,
        }
    }

    /// The numeric fields as a telemetry reading (used when an event is
    /// fresher than the raw telemetry feed, and for pinned history views).
    pub fn reading(&self) -> TelemetryReading {
        TelemetryReading {
            speed: self.speed,
            power: self.power,
            latitude: self.latitude,
            longitude: self.longitude,
            person_count: self.person_count,
        }
    }
}
