// ── Wire -> domain conversions ──

use chrono::{DateTime, Utc};

use dronewatch_api::types as wire;

use crate::model::{EventDetail, EventRecord, EventSeverity, TelemetryReading};

impl From<wire::TelemetryData> for TelemetryReading {
    fn from(data: wire::TelemetryData) -> Self {
        Self {
            speed: data.speed,
            power: data.power,
            latitude: data.latitude,
            longitude: data.longitude,
            person_count: data.person_count,
        }
    }
}

impl From<wire::Severity> for EventSeverity {
    fn from(severity: wire::Severity) -> Self {
        match severity {
            wire::Severity::Info => Self::Info,
            wire::Severity::Alert => Self::Alert,
            wire::Severity::Danger => Self::Danger,
            wire::Severity::Critical => Self::Critical,
        }
    }
}

impl From<wire::EventData> for EventRecord {
    fn from(data: wire::EventData) -> Self {
        Self {
            speed: data.speed,
            power: data.power,
            latitude: data.latitude,
            longitude: data.longitude,
            person_count: data.person_count,
            detail: EventDetail {
                message: data.event_detail.message,
                image: data.event_detail.image,
            },
            severity: data.severity.map(EventSeverity::from),
        }
    }
}

/// Map a wire `updatedAt` to a domain timestamp. The backend uses `0`
/// as a "never observed" sentinel; that must not leak in as 1970.
pub(crate) fn observed_at(millis: i64) -> Option<DateTime<Utc>> {
    if millis > 0 {
        DateTime::from_timestamp_millis(millis)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_updated_at_is_unknown() {
        assert_eq!(observed_at(0), None);
        assert_eq!(observed_at(-5), None);
    }

    #[test]
    fn positive_updated_at_converts() {
        let ts = observed_at(1_700_000_000_000).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn event_data_maps_severity_and_detail() {
        let data = wire::EventData {
            speed: Some(1.0),
            power: Some(50.0),
            latitude: None,
            longitude: None,
            person_count: Some(2),
            event_detail: wire::EventDetail {
                message: "PERSON DETECTED".into(),
                image: "frame.jpg".into(),
            },
            severity: Some(wire::Severity::Danger),
        };

        let record = EventRecord::from(data);
        assert_eq!(record.severity, Some(EventSeverity::Danger));
        assert_eq!(record.detail.message, "PERSON DETECTED");
        assert_eq!(record.reading().person_count, Some(2));
    }
}
