//! Synchronization layer between `dronewatch-api` and UI consumers.
//!
//! This crate owns the business logic and domain model for the
//! dronewatch workspace:
//!
//! - **[`SyncEngine`]** — Merges the independently-updating telemetry
//!   and event feeds into one coherent [`UnitSnapshot`] per drone,
//!   maintains bounded per-unit histories, the global event ticker, and
//!   per-unit unread counters. [`refresh_all()`](SyncEngine::refresh_all)
//!   runs one fan-out/join-all poll cycle; committed snapshots are
//!   published through `tokio::sync::watch` channels.
//!
//! - **[`PollScheduler`]** — Owns the periodic refresh timer with a
//!   single-timer invariant: changing the cadence cancels the existing
//!   schedule before starting the next.
//!
//! - **[`projector`]** — Derives the detail view for the selected unit:
//!   live merged state, or a pinned historical event overriding it.
//!
//! - **[`DataGateway`]** — The seam to the remote backend. The engine
//!   never retries and never sees HTTP; failures arrive as typed
//!   [`CoreError`] values, of which only
//!   [`SessionExpired`](CoreError::SessionExpired) crosses the boundary
//!   as a forced action (logout).

pub mod convert;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod history;
pub mod model;
pub mod projector;
pub mod scheduler;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use engine::{EngineStatus, SyncEngine, TICKER_CAPACITY, UNIT_HISTORY_CAPACITY};
pub use error::CoreError;
pub use gateway::{DataGateway, EventSample, TelemetrySample};
pub use history::BoundedLog;
pub use projector::UnitView;
pub use scheduler::{PollScheduler, RefreshInterval};
pub use session::Session;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    EventDetail,
    EventLogEntry,
    EventRecord,
    EventSeverity,
    TelemetryLogEntry,
    TelemetryReading,
    UnitSnapshot,
};
