// ── Telemetry domain types ──

use serde::{Deserialize, Serialize};

/// One merged telemetry reading for a unit.
///
/// Every field is optional: drones report fields independently and a
/// missing value is rendered as "not available" rather than a fake zero.
/// [`zeroed()`](Self::zeroed) is the pre-first-poll default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetryReading {
    /// Ground speed in km/h.
    pub speed: Option<f64>,
    /// Battery percentage, 0–100.
    pub power: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Persons detected in the camera frame.
    pub person_count: Option<u32>,
}

impl TelemetryReading {
    /// The all-zeros reading used before a unit's first successful poll.
    pub fn zeroed() -> Self {
        Self {
            speed: Some(0.0),
            power: Some(0.0),
            latitude: Some(0.0),
            longitude: Some(0.0),
            person_count: Some(0),
        }
    }

    /// Whether `other` describes the same track point: equal speed and
    /// position. Consecutive identical readings are not logged twice.
    pub fn same_track(&self, other: &Self) -> bool {
        self.speed == other.speed
            && self.latitude == other.latitude
            && self.longitude == other.longitude
    }
}
