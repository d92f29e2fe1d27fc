// Drone data endpoints: active roster, telemetry, events.

use crate::client::DashboardClient;
use crate::error::Error;
use crate::types::{EventResponse, TelemetryResponse};

impl DashboardClient {
    /// List the serials of all currently active drones.
    pub async fn alive_drones(&self) -> Result<Vec<String>, Error> {
        let url = self.api_url("/api/dashboard/alive-drones");
        self.get(url).await
    }

    /// Fetch the latest telemetry reading for one drone.
    pub async fn telemetry(&self, serial: &str) -> Result<TelemetryResponse, Error> {
        let url = self.api_url(&format!("/api/dashboard/drone/telemetry/{serial}"));
        self.get(url).await
    }

    /// Fetch the latest event record for one drone.
    pub async fn event(&self, serial: &str) -> Result<EventResponse, Error> {
        let url = self.api_url(&format!("/api/dashboard/drone/event/{serial}"));
        self.get(url).await
    }
}
