// ── Core error types ──
//
// User-facing errors from dronewatch-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<dronewatch_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The bearer token was rejected. This is the only error that forces
    /// an action across the engine boundary: the caller must log out.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// Login or registration rejected. Surfaced to the user; never
    /// affects a running engine.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Transport failure. Poll cycles absorb these per sub-fetch and
    /// fall back to the last known data.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Unparseable payload. Treated exactly like a network failure.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Backend rejected the request with a structured message.
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    /// Configuration problem (bad URL, missing session, etc.)
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether this error must terminate the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<dronewatch_api::Error> for CoreError {
    fn from(err: dronewatch_api::Error) -> Self {
        match err {
            dronewatch_api::Error::SessionExpired => CoreError::SessionExpired,
            dronewatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            dronewatch_api::Error::Transport(e) => CoreError::Network {
                message: e.to_string(),
            },
            dronewatch_api::Error::Tls(message) => CoreError::Network { message },
            dronewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            dronewatch_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            dronewatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
