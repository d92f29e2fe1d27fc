//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use dronewatch_config::ConfigError;
use dronewatch_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Session expired")]
    #[diagnostic(
        code(dronewatch::session_expired),
        help("Your session token was rejected by the backend.\nLog in again: dronewatch login <username>")
    )]
    SessionExpired,

    #[error("Not logged in")]
    #[diagnostic(
        code(dronewatch::no_session),
        help("Log in first: dronewatch login <username>")
    )]
    NoSession,

    #[error("Authentication failed: {message}")]
    #[diagnostic(code(dronewatch::auth_failed))]
    AuthFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach the dashboard backend")]
    #[diagnostic(
        code(dronewatch::network),
        help("Check server_url in your config and that the backend is running.\nDetails: {message}")
    )]
    Network { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(dronewatch::api_error))]
    Api { message: String },

    #[error("Backend sent an unparseable response: {message}")]
    #[diagnostic(code(dronewatch::malformed))]
    Malformed { message: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dronewatch::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(dronewatch::config))]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SessionExpired | Self::NoSession | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Network { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError -> CliError mapping ────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionExpired => CliError::SessionExpired,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Network { message } => CliError::Network { message },
            CoreError::MalformedResponse { message } => CliError::Malformed { message },
            CoreError::Api { message, status: _ } => CliError::Api { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<dronewatch_api::Error> for CliError {
    fn from(err: dronewatch_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
