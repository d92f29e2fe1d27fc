// ── Domain model ──
//
// Canonical types produced by the synchronization engine. Wire shapes
// from `dronewatch-api` are converted in `crate::convert` -- consumers
// never see the backend's envelopes.

mod event;
mod telemetry;
mod unit;

pub use event::{EventDetail, EventRecord, EventSeverity};
pub use telemetry::TelemetryReading;
pub use unit::{EventLogEntry, TelemetryLogEntry, UnitSnapshot};
