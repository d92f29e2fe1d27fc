//! Live watch loop: scheduler-driven polling rendered to the terminal.
//!
//! Subscribes to the engine's unit and status watches, reprints the
//! roster on every committed cycle, and streams new ticker entries
//! between tables. Runs until Ctrl-C, or until the session expires --
//! which clears the persisted session, mirroring a forced logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tracing::warn;

use dronewatch_api::DashboardClient;
use dronewatch_config::{Config, SessionStore};
use dronewatch_core::{
    CoreError, EngineStatus, EventLogEntry, PollScheduler, RefreshInterval, SyncEngine,
};

use crate::cli::OutputFormat;
use crate::commands::units::render_units;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: DashboardClient,
    config: &Config,
    interval: Option<RefreshInterval>,
) -> Result<(), CliError> {
    if !client.has_token() {
        return Err(CliError::NoSession);
    }

    let interval = match interval {
        Some(interval) => interval,
        None => config.refresh_interval()?,
    };

    let engine = Arc::new(SyncEngine::new(client));
    let mut units_rx = engine.subscribe_units();
    let mut status_rx = engine.subscribe_status();

    // Initial fetch before the schedule starts, like the dashboard mount.
    match engine.refresh_all().await {
        Ok(_) => {}
        Err(CoreError::SessionExpired) => return forced_logout(),
        Err(e) => warn!(error = %e, "initial refresh failed"),
    }

    let mut scheduler = PollScheduler::new(Arc::clone(&engine));
    scheduler.set_interval(interval);

    println!(
        "{} every {} -- Ctrl-C to exit",
        "WATCHING".green().bold(),
        interval
    );
    let mut last_event_ts: Option<DateTime<Utc>> = None;
    {
        let units = units_rx.borrow_and_update().clone();
        let unread = engine.unread_counts().await;
        println!("{}", render_units(OutputFormat::Table, &units, &unread));
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            changed = units_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let units = units_rx.borrow_and_update().clone();

                for entry in fresh_ticker_entries(&engine, &mut last_event_ts).await {
                    print_ticker_entry(&entry);
                }

                let unread = engine.unread_counts().await;
                println!("{}", render_units(OutputFormat::Table, &units, &unread));
            }

            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if *status_rx.borrow_and_update() == EngineStatus::SessionExpired {
                    scheduler.stop();
                    return forced_logout();
                }
            }
        }
    }

    scheduler.stop();
    Ok(())
}

/// Ticker entries that arrived since the last table render, oldest first.
async fn fresh_ticker_entries(
    engine: &SyncEngine<DashboardClient>,
    last_seen: &mut Option<DateTime<Utc>>,
) -> Vec<EventLogEntry> {
    let mut fresh: Vec<EventLogEntry> = engine
        .ticker()
        .await
        .into_iter()
        .filter(|e| last_seen.is_none_or(|seen| e.timestamp > seen))
        .collect();
    fresh.reverse();

    if let Some(newest) = fresh.iter().map(|e| e.timestamp).max() {
        *last_seen = Some(newest);
    }
    fresh
}

fn print_ticker_entry(entry: &EventLogEntry) {
    let severity = entry
        .record
        .severity
        .map_or_else(String::new, |s| format!(" [{s}]"));
    println!(
        "{} {} {}{}",
        output::fmt_time(entry.timestamp).dimmed(),
        entry.unit_name.cyan().bold(),
        entry.record.detail.message,
        severity.yellow(),
    );
}

/// The session token was rejected: clear persisted credentials and
/// surface the forced logout.
fn forced_logout() -> Result<(), CliError> {
    SessionStore::new().clear()?;
    Err(CliError::SessionExpired)
}
