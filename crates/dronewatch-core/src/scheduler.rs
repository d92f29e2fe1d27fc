// ── Poll scheduler ──
//
// Owns the periodic refresh timer. Invariant: at most one timer task
// exists per scheduler -- every cadence change cancels the previous
// task before spawning the next. In-flight cycles are never aborted
// mid-flight; cancellation takes effect at the next tick boundary.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::engine::SyncEngine;
use crate::error::CoreError;
use crate::gateway::DataGateway;

// ── RefreshInterval ──────────────────────────────────────────────

/// User-selectable polling cadence. `Off` halts scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshInterval {
    Off,
    Sec1,
    Sec3,
    Sec5,
    #[default]
    Sec10,
    Sec30,
    Min1,
    Min5,
    Min10,
}

impl RefreshInterval {
    /// Every selectable cadence, in ascending order.
    pub const ALL: [Self; 9] = [
        Self::Off,
        Self::Sec1,
        Self::Sec3,
        Self::Sec5,
        Self::Sec10,
        Self::Sec30,
        Self::Min1,
        Self::Min5,
        Self::Min10,
    ];

    pub fn as_millis(self) -> u64 {
        match self {
            Self::Off => 0,
            Self::Sec1 => 1_000,
            Self::Sec3 => 3_000,
            Self::Sec5 => 5_000,
            Self::Sec10 => 10_000,
            Self::Sec30 => 30_000,
            Self::Min1 => 60_000,
            Self::Min5 => 300_000,
            Self::Min10 => 600_000,
        }
    }

    /// The tick period, or `None` for the off sentinel.
    pub fn period(self) -> Option<Duration> {
        match self {
            Self::Off => None,
            other => Some(Duration::from_millis(other.as_millis())),
        }
    }

    pub fn from_millis(millis: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_millis() == millis)
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Off => "off",
            Self::Sec1 => "1s",
            Self::Sec3 => "3s",
            Self::Sec5 => "5s",
            Self::Sec10 => "10s",
            Self::Sec30 => "30s",
            Self::Min1 => "1m",
            Self::Min5 => "5m",
            Self::Min10 => "10m",
        };
        f.write_str(label)
    }
}

impl FromStr for RefreshInterval {
    type Err = String;

    /// Accepts the cadence labels (`off`, `1s`, ... `10m`) or a raw
    /// millisecond value from the supported set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(interval) = Self::ALL.into_iter().find(|i| i.to_string() == s) {
            return Ok(interval);
        }
        if let Ok(millis) = s.parse::<u64>() {
            if let Some(interval) = Self::from_millis(millis) {
                return Ok(interval);
            }
        }
        Err(format!(
            "unsupported interval {s:?} (expected one of: off, 1s, 3s, 5s, 10s, 30s, 1m, 5m, 10m)"
        ))
    }
}

// ── PollScheduler ────────────────────────────────────────────────

struct Timer {
    cancel: CancellationToken,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

/// Drives [`SyncEngine::refresh_all`] on the selected cadence.
///
/// Manual refreshes go straight to the engine and neither reset nor
/// disturb the schedule's phase.
pub struct PollScheduler<G: DataGateway + 'static> {
    engine: Arc<SyncEngine<G>>,
    interval: RefreshInterval,
    timer: Option<Timer>,
}

impl<G: DataGateway + 'static> PollScheduler<G> {
    /// Create a stopped scheduler.
    pub fn new(engine: Arc<SyncEngine<G>>) -> Self {
        Self {
            engine,
            interval: RefreshInterval::Off,
            timer: None,
        }
    }

    pub fn interval(&self) -> RefreshInterval {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Change the cadence. Cancels the existing timer first, then spawns
    /// a fresh one unless the new interval is `Off`.
    pub fn set_interval(&mut self, interval: RefreshInterval) {
        self.stop();
        self.interval = interval;

        let Some(period) = interval.period() else {
            debug!("polling halted");
            return;
        };

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(
            Arc::clone(&self.engine),
            period,
            cancel.clone(),
        ));
        self.timer = Some(Timer { cancel, handle });
        debug!(%interval, "polling scheduled");
    }

    /// Cancel the timer. An in-flight cycle finishes but will not
    /// reschedule itself.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel.cancel();
        }
    }
}

impl<G: DataGateway + 'static> Drop for PollScheduler<G> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_task<G: DataGateway>(
    engine: Arc<SyncEngine<G>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match engine.refresh_all().await {
                    Ok(_) => {}
                    Err(CoreError::SessionExpired) => {
                        warn!("session expired -- polling stopped");
                        break;
                    }
                    Err(e) => warn!(error = %e, "periodic refresh failed"),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn interval_round_trips_through_labels() {
        for interval in RefreshInterval::ALL {
            let parsed: RefreshInterval = interval.to_string().parse().unwrap();
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn interval_parses_from_millis() {
        assert_eq!(
            "3000".parse::<RefreshInterval>().unwrap(),
            RefreshInterval::Sec3
        );
        assert_eq!(
            "600000".parse::<RefreshInterval>().unwrap(),
            RefreshInterval::Min10
        );
        assert!("2500".parse::<RefreshInterval>().is_err());
        assert!("soon".parse::<RefreshInterval>().is_err());
    }

    #[test]
    fn off_has_no_period() {
        assert_eq!(RefreshInterval::Off.period(), None);
        assert_eq!(
            RefreshInterval::Sec10.period(),
            Some(Duration::from_secs(10))
        );
    }
}
