// ── Unit snapshot and history entry types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventRecord;
use super::telemetry::TelemetryReading;

/// The merged state of one tracked drone, keyed by serial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Stable identity for the session.
    pub serial: String,
    /// Display name derived from the serial.
    pub name: String,
    /// Latest merged reading; zeroed before the first successful poll.
    pub telemetry: TelemetryReading,
    /// Latest known event, or the STANDBY placeholder.
    pub event: EventRecord,
    /// `max(telemetry time, event time)`, falling back to poll time.
    /// Monotonically non-decreasing per unit.
    pub last_update: DateTime<Utc>,
}

impl UnitSnapshot {
    /// Derive the display name for a serial.
    pub fn display_name(serial: &str) -> String {
        serial.to_uppercase()
    }
}

/// An immutable telemetry snapshot in a unit's history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryLogEntry {
    pub reading: TelemetryReading,
    pub timestamp: DateTime<Utc>,
}

/// An immutable event snapshot, annotated with its owning unit so the
/// global ticker can interleave entries across units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub serial: String,
    pub unit_name: String,
    pub record: EventRecord,
    pub timestamp: DateTime<Utc>,
}
