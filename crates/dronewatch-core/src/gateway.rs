// ── Remote data gateway seam ──
//
// The engine talks to the backend through this trait so the poll logic
// is testable against a scripted gateway. `DashboardClient` is the one
// production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dronewatch_api::DashboardClient;

use crate::convert;
use crate::error::CoreError;
use crate::model::{EventRecord, TelemetryReading};

/// One telemetry fetch result: the reading plus when the backend
/// observed it (`None` = never).
#[derive(Debug, Clone)]
pub struct TelemetrySample {
    pub reading: TelemetryReading,
    pub observed_at: Option<DateTime<Utc>>,
}

/// One event fetch result.
#[derive(Debug, Clone)]
pub struct EventSample {
    pub record: EventRecord,
    pub observed_at: Option<DateTime<Utc>>,
}

/// The four read operations the synchronization engine consumes.
///
/// Implementations do not retry -- retry policy, if ever added, belongs
/// to the engine.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Serials of all currently active units.
    async fn list_active_units(&self) -> Result<Vec<String>, CoreError>;

    /// Latest telemetry reading for one unit.
    async fn fetch_telemetry(&self, serial: &str) -> Result<TelemetrySample, CoreError>;

    /// Latest event record for one unit.
    async fn fetch_event(&self, serial: &str) -> Result<EventSample, CoreError>;
}

#[async_trait]
impl DataGateway for DashboardClient {
    async fn list_active_units(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.alive_drones().await?)
    }

    async fn fetch_telemetry(&self, serial: &str) -> Result<TelemetrySample, CoreError> {
        let resp = self.telemetry(serial).await?;
        Ok(TelemetrySample {
            reading: resp.data.into(),
            observed_at: convert::observed_at(resp.updated_at),
        })
    }

    async fn fetch_event(&self, serial: &str) -> Result<EventSample, CoreError> {
        let resp = self.event(serial).await?;
        Ok(EventSample {
            record: resp.data.into(),
            observed_at: convert::observed_at(resp.updated_at),
        })
    }
}
