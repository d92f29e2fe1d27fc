// ── Synchronization engine ──
//
// Orchestrates poll cycles across all active units: fetches the roster,
// fans out per-unit telemetry/event fetches, merges each pair into a
// unit snapshot, and maintains the bounded histories, the global event
// ticker, and the per-unit unread counters. The committed unit list is
// published through a watch channel for reactive consumers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::gateway::{DataGateway, EventSample, TelemetrySample};
use crate::history::BoundedLog;
use crate::model::{EventLogEntry, EventRecord, TelemetryLogEntry, TelemetryReading, UnitSnapshot};
use crate::projector::{self, UnitView};

/// Per-unit telemetry and event history capacity.
pub const UNIT_HISTORY_CAPACITY: usize = 50;
/// Global cross-unit event ticker capacity.
pub const TICKER_CAPACITY: usize = 40;

// ── EngineStatus ─────────────────────────────────────────────────

/// Engine status observable by consumers.
///
/// `SessionExpired` is sticky: once the backend rejects the bearer
/// token the only way forward is a fresh login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    Refreshing,
    SessionExpired,
}

// ── Engine state ─────────────────────────────────────────────────

struct EngineState {
    /// Committed unit list from the last completed cycle, sorted by
    /// serial. Cycles read this and never observe in-progress siblings.
    units: Arc<Vec<UnitSnapshot>>,
    telemetry_history: HashMap<String, BoundedLog<TelemetryLogEntry>>,
    event_history: HashMap<String, BoundedLog<EventLogEntry>>,
    ticker: BoundedLog<EventLogEntry>,
    unread: HashMap<String, u32>,
    /// Timestamp of the newest event already logged per unit. An event
    /// is appended only when its timestamp strictly exceeds this.
    last_seen: HashMap<String, DateTime<Utc>>,
    selected: Option<String>,
    pinned: Option<EventLogEntry>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            units: Arc::new(Vec::new()),
            telemetry_history: HashMap::new(),
            event_history: HashMap::new(),
            ticker: BoundedLog::new(TICKER_CAPACITY),
            unread: HashMap::new(),
            last_seen: HashMap::new(),
            selected: None,
            pinned: None,
        }
    }
}

// ── SyncEngine ───────────────────────────────────────────────────

/// The synchronization engine: merges the telemetry and event feeds
/// into coherent per-unit state.
///
/// All mutable state lives behind a single lock; poll cycles serialize
/// on a dedicated single-flight guard so a manual refresh racing a
/// scheduled tick coalesces into back-to-back cycles instead of racing
/// to commit.
pub struct SyncEngine<G> {
    gateway: G,
    state: Mutex<EngineState>,
    /// Single-flight guard for poll cycles.
    cycle: Mutex<()>,
    units_tx: watch::Sender<Arc<Vec<UnitSnapshot>>>,
    status_tx: watch::Sender<EngineStatus>,
}

impl<G: DataGateway> SyncEngine<G> {
    pub fn new(gateway: G) -> Self {
        let (units_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (status_tx, _) = watch::channel(EngineStatus::Idle);

        Self {
            gateway,
            state: Mutex::new(EngineState::default()),
            cycle: Mutex::new(()),
            units_tx,
            status_tx,
        }
    }

    // ── Poll cycle ───────────────────────────────────────────────

    /// Run one full poll cycle and return the committed unit list.
    ///
    /// Fetches the active roster, then concurrently fetches telemetry
    /// and events per unit. A failed sub-fetch degrades that field to
    /// its last known value; [`CoreError::SessionExpired`] aborts the
    /// cycle immediately (mutations already applied stand) and must be
    /// answered with a logout.
    pub async fn refresh_all(&self) -> Result<Arc<Vec<UnitSnapshot>>, CoreError> {
        let _cycle = self.cycle.lock().await;
        self.status_tx.send_replace(EngineStatus::Refreshing);

        let result = self.run_cycle().await;

        let status = match &result {
            Err(CoreError::SessionExpired) => EngineStatus::SessionExpired,
            _ => EngineStatus::Idle,
        };
        self.status_tx.send_replace(status);

        result
    }

    async fn run_cycle(&self) -> Result<Arc<Vec<UnitSnapshot>>, CoreError> {
        let serials = self.gateway.list_active_units().await?;
        let cycle_start = Utc::now();

        // Snapshot of the previous cycle's committed state. Per-unit
        // merges read this, never each other's in-progress results.
        let prev = Arc::clone(&self.state.lock().await.units);

        let mut fetches: FuturesUnordered<_> = serials
            .into_iter()
            .map(|serial| async move {
                let (telemetry, event) = tokio::join!(
                    self.gateway.fetch_telemetry(&serial),
                    self.gateway.fetch_event(&serial),
                );
                (serial, telemetry, event)
            })
            .collect();

        let mut units = Vec::new();

        // Apply each unit's mutations as its fetch pair completes.
        while let Some((serial, telemetry_res, event_res)) = fetches.next().await {
            let telemetry = tolerate(telemetry_res, &serial, "telemetry")?;
            let event = tolerate(event_res, &serial, "event")?;

            let mut state = self.state.lock().await;
            units.push(apply_unit(
                &mut state,
                &prev,
                serial,
                telemetry,
                event,
                cycle_start,
            ));
        }
        drop(fetches);

        // Deterministic render order.
        units.sort_by(|a, b| a.serial.cmp(&b.serial));
        let snapshot = Arc::new(units);

        self.state.lock().await.units = Arc::clone(&snapshot);
        self.units_tx.send_replace(Arc::clone(&snapshot));

        debug!(units = snapshot.len(), "poll cycle complete");
        Ok(snapshot)
    }

    // ── Selection and pinning ────────────────────────────────────

    /// Change the selected unit.
    ///
    /// Resets the new selection's unread counter and reverts the detail
    /// view to live data by clearing any pinned history focus.
    pub async fn set_selected_unit(&self, serial: Option<&str>) {
        let mut state = self.state.lock().await;
        if let Some(serial) = serial {
            state.unread.insert(serial.to_owned(), 0);
        }
        state.selected = serial.map(std::borrow::ToOwned::to_owned);
        state.pinned = None;
    }

    /// Pin a historical event so the detail view shows it instead of
    /// live data, until cleared or the selection changes.
    pub async fn pin_history_entry(&self, entry: EventLogEntry) {
        self.state.lock().await.pinned = Some(entry);
    }

    /// Return the detail view to live data.
    pub async fn clear_pin(&self) {
        self.state.lock().await.pinned = None;
    }

    /// Project the detail view for the current selection.
    /// `None` = no unit selected.
    pub async fn display_state(&self) -> Option<UnitView> {
        let state = self.state.lock().await;
        let selected = state
            .selected
            .as_deref()
            .and_then(|serial| state.units.iter().find(|u| u.serial == serial));
        projector::project(selected, state.pinned.as_ref())
    }

    // ── Snapshot accessors ───────────────────────────────────────

    pub async fn units(&self) -> Arc<Vec<UnitSnapshot>> {
        Arc::clone(&self.state.lock().await.units)
    }

    pub async fn selected_unit(&self) -> Option<String> {
        self.state.lock().await.selected.clone()
    }

    /// Newest-first telemetry history for one unit.
    pub async fn telemetry_history(&self, serial: &str) -> Vec<TelemetryLogEntry> {
        self.state
            .lock()
            .await
            .telemetry_history
            .get(serial)
            .map(BoundedLog::to_vec)
            .unwrap_or_default()
    }

    /// Newest-first event history for one unit.
    pub async fn event_history(&self, serial: &str) -> Vec<EventLogEntry> {
        self.state
            .lock()
            .await
            .event_history
            .get(serial)
            .map(BoundedLog::to_vec)
            .unwrap_or_default()
    }

    /// Newest-first global event ticker across all units.
    pub async fn ticker(&self) -> Vec<EventLogEntry> {
        self.state.lock().await.ticker.to_vec()
    }

    pub async fn unread_count(&self, serial: &str) -> u32 {
        self.state
            .lock()
            .await
            .unread
            .get(serial)
            .copied()
            .unwrap_or(0)
    }

    pub async fn unread_counts(&self) -> HashMap<String, u32> {
        self.state.lock().await.unread.clone()
    }

    // ── Subscriptions ────────────────────────────────────────────

    /// Subscribe to committed unit-list snapshots.
    pub fn subscribe_units(&self) -> watch::Receiver<Arc<Vec<UnitSnapshot>>> {
        self.units_tx.subscribe()
    }

    /// Subscribe to engine status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<EngineStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> EngineStatus {
        *self.status_tx.borrow()
    }
}

// ── Cycle helpers ────────────────────────────────────────────────

/// Degrade a failed sub-fetch to `None`, except session expiry which
/// aborts the whole cycle.
fn tolerate<T>(
    result: Result<T, CoreError>,
    serial: &str,
    what: &str,
) -> Result<Option<T>, CoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(CoreError::SessionExpired) => Err(CoreError::SessionExpired),
        Err(e) => {
            warn!(serial, error = %e, "{what} fetch failed (non-fatal)");
            Ok(None)
        }
    }
}

/// Merge one unit's fetch pair into its snapshot and apply the history,
/// ticker, and unread mutations.
fn apply_unit(
    state: &mut EngineState,
    prev: &[UnitSnapshot],
    serial: String,
    telemetry: Option<TelemetrySample>,
    event: Option<EventSample>,
    cycle_start: DateTime<Utc>,
) -> UnitSnapshot {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    let prev_unit = prev.iter().find(|u| u.serial == serial);

    let telemetry_time = telemetry.as_ref().and_then(|s| s.observed_at);
    let event_time = event.as_ref().and_then(|s| s.observed_at);

    // Freshness priority: raw telemetry when at least as new as the
    // event, else the event's embedded numbers, else prior state.
    let merged_telemetry = match (&telemetry, &event) {
        (Some(t), _) if telemetry_time.unwrap_or(epoch) >= event_time.unwrap_or(epoch) => {
            t.reading.clone()
        }
        (_, Some(e)) => e.record.reading(),
        _ => prev_unit.map_or_else(TelemetryReading::zeroed, |u| u.telemetry.clone()),
    };

    let merged_event = match (&event, prev_unit) {
        (Some(e), _) => e.record.clone(),
        (None, Some(u)) => u.event.clone(),
        (None, None) => EventRecord::standby(&merged_telemetry),
    };

    let last_update = telemetry_time
        .into_iter()
        .chain(event_time)
        .max()
        .unwrap_or(cycle_start);

    // Telemetry history: skip entries identical in speed and position
    // to the most recent one.
    let log = state
        .telemetry_history
        .entry(serial.clone())
        .or_insert_with(|| BoundedLog::new(UNIT_HISTORY_CAPACITY));
    let duplicate = log
        .latest()
        .is_some_and(|e| e.reading.same_track(&merged_telemetry));
    if !duplicate {
        log.push(TelemetryLogEntry {
            reading: merged_telemetry.clone(),
            timestamp: last_update,
        });
    }

    // Event history and ticker: strictly newer events only.
    if let (Some(_), Some(event_ts)) = (&event, event_time) {
        let already_seen = state
            .last_seen
            .get(&serial)
            .is_some_and(|seen| event_ts <= *seen);
        if !already_seen {
            let entry = EventLogEntry {
                serial: serial.clone(),
                unit_name: UnitSnapshot::display_name(&serial),
                record: merged_event.clone(),
                timestamp: event_ts,
            };

            state
                .event_history
                .entry(serial.clone())
                .or_insert_with(|| BoundedLog::new(UNIT_HISTORY_CAPACITY))
                .push(entry.clone());
            state.ticker.push(entry);

            if state.selected.as_deref() != Some(serial.as_str()) {
                *state.unread.entry(serial.clone()).or_insert(0) += 1;
            }

            state.last_seen.insert(serial.clone(), event_ts);
        }
    }

    UnitSnapshot {
        name: UnitSnapshot::display_name(&serial),
        serial,
        telemetry: merged_telemetry,
        event: merged_event,
        last_update,
    }
}
