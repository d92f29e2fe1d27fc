// ── View state projector ──
//
// Derives what the detail view shows for the selected unit: live merged
// data, or a pinned historical event that overrides it until cleared.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{EventLogEntry, EventRecord, TelemetryReading, UnitSnapshot};

/// The projected detail view for one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitView {
    pub serial: String,
    pub name: String,
    pub telemetry: TelemetryReading,
    pub event: EventRecord,
    pub timestamp: DateTime<Utc>,
    /// `false` when a pinned historical entry overrides the live feed.
    pub is_live: bool,
}

/// Project the detail view. `None` = awaiting selection.
///
/// A pinned entry wins over live state regardless of what the engine
/// currently holds; its telemetry is synthesized from the event's
/// numeric fields and its own timestamp is shown.
pub fn project(
    selected: Option<&UnitSnapshot>,
    pinned: Option<&EventLogEntry>,
) -> Option<UnitView> {
    let unit = selected?;

    if let Some(entry) = pinned {
        return Some(UnitView {
            serial: unit.serial.clone(),
            name: unit.name.clone(),
            telemetry: entry.record.reading(),
            event: entry.record.clone(),
            timestamp: entry.timestamp,
            is_live: false,
        });
    }

    Some(UnitView {
        serial: unit.serial.clone(),
        name: unit.name.clone(),
        telemetry: unit.telemetry.clone(),
        event: unit.event.clone(),
        timestamp: unit.last_update,
        is_live: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EventDetail;

    fn snapshot(serial: &str) -> UnitSnapshot {
        let telemetry = TelemetryReading {
            speed: Some(12.0),
            power: Some(80.0),
            latitude: Some(37.5),
            longitude: Some(127.0),
            person_count: Some(1),
        };
        UnitSnapshot {
            serial: serial.into(),
            name: UnitSnapshot::display_name(serial),
            event: EventRecord::standby(&telemetry),
            telemetry,
            last_update: DateTime::from_timestamp_millis(1_000).unwrap(),
        }
    }

    #[test]
    fn no_selection_projects_nothing() {
        assert_eq!(project(None, None), None);
    }

    #[test]
    fn live_view_uses_snapshot_fields() {
        let unit = snapshot("aero-x1");
        let view = project(Some(&unit), None).unwrap();

        assert!(view.is_live);
        assert_eq!(view.name, "AERO-X1");
        assert_eq!(view.telemetry, unit.telemetry);
        assert_eq!(view.timestamp, unit.last_update);
    }

    #[test]
    fn pinned_entry_overrides_live_state() {
        let unit = snapshot("aero-x1");
        let entry = EventLogEntry {
            serial: unit.serial.clone(),
            unit_name: unit.name.clone(),
            record: EventRecord {
                speed: Some(3.0),
                power: Some(55.0),
                latitude: Some(36.0),
                longitude: Some(128.0),
                person_count: Some(4),
                detail: EventDetail {
                    message: "PERSON DETECTED".into(),
                    image: String::new(),
                },
                severity: None,
            },
            timestamp: DateTime::from_timestamp_millis(500).unwrap(),
        };

        let view = project(Some(&unit), Some(&entry)).unwrap();

        assert!(!view.is_live);
        assert_eq!(view.telemetry.speed, Some(3.0));
        assert_eq!(view.telemetry.person_count, Some(4));
        assert_eq!(view.event.detail.message, "PERSON DETECTED");
        assert_eq!(view.timestamp, entry.timestamp);
    }
}
