//! Async client for the dronewatch dashboard backend.
//!
//! Exposes the four surfaces the platform consumes: authentication
//! (login/register), the active-drone roster, per-drone telemetry, and
//! per-drone events. Transport failures and session expiry are reported
//! as typed [`Error`] variants so callers can pattern-match instead of
//! probing status codes.

mod auth;
mod client;
mod drones;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DashboardClient;
pub use error::Error;
pub use transport::TransportConfig;
