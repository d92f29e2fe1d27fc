//! Shared configuration for the dronewatch CLI.
//!
//! TOML config file merged with `DRONEWATCH_*` environment variables,
//! plus the durable session store: the authenticated identity and
//! bearer token persisted across invocations and cleared entirely on
//! logout.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dronewatch_core::{RefreshInterval, Session};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse session file: {0}")]
    SessionParse(#[from] toml::de::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL (e.g. "https://ops.example.net").
    pub server_url: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Default polling cadence in milliseconds. Must be one of the
    /// supported interval values; `0` disables scheduling.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            timeout: default_timeout(),
            refresh_interval_ms: default_refresh_interval_ms(),
            insecure: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval_ms() -> u64 {
    RefreshInterval::Sec10.as_millis()
}

impl Config {
    /// The configured cadence as a typed interval.
    pub fn refresh_interval(&self) -> Result<RefreshInterval, ConfigError> {
        RefreshInterval::from_millis(self.refresh_interval_ms).ok_or_else(|| {
            ConfigError::Validation {
                field: "refresh_interval_ms".into(),
                reason: format!("unsupported value {}", self.refresh_interval_ms),
            }
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "dronewatch", "dronewatch")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the session file path (data dir, not config dir).
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.toml"),
        |dirs| dirs.data_dir().join("session.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dronewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults + file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path (file may be absent).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DRONEWATCH_"))
        .extract()?;
    Ok(config)
}

// ── Session persistence ─────────────────────────────────────────────

/// On-disk shape of a persisted session.
#[derive(Debug, Deserialize, Serialize)]
struct SessionRecord {
    user_id: String,
    username: String,
    token: String,
}

/// Durable store for the authenticated session.
///
/// One TOML file under the platform data dir. `clear` removes the file
/// entirely -- nothing of the session survives a logout.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            path: session_path(),
        }
    }

    /// Store backed by an explicit path (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Persist the session, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> Result<(), ConfigError> {
        let record = SessionRecord {
            user_id: session.user_id.clone(),
            username: session.username.clone(),
            token: session.token.expose_secret().to_owned(),
        };
        let body = toml::to_string_pretty(&record)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, body)?;
        Ok(())
    }

    /// Load the persisted session, or `None` if none exists.
    pub fn load(&self) -> Result<Option<Session>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let body = std::fs::read_to_string(&self.path)?;
        let record: SessionRecord = toml::from_str(&body)?;
        Ok(Some(Session::new(
            record.user_id,
            record.username,
            SecretString::from(record.token),
        )))
    }

    /// Remove the persisted session (logout).
    pub fn clear(&self) -> Result<(), ConfigError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("nested/session.toml"));

        let session = Session::new("op-1", "operator", SecretString::from("tok-xyz".to_string()));
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.user_id, "op-1");
        assert_eq!(loaded.username, "operator");
        assert_eq!(loaded.token.expose_secret(), "tok-xyz");
    }

    #[test]
    fn load_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.toml"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.toml"));

        let session = Session::new("op-1", "operator", SecretString::from("tok".to_string()));
        store.save(&session).unwrap();
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn config_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server_url = \"https://ops.example.net\"\nrefresh_interval_ms = 3000\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.server_url, "https://ops.example.net");
        assert_eq!(config.refresh_interval().unwrap(), RefreshInterval::Sec3);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn unsupported_interval_is_rejected() {
        let config = Config {
            refresh_interval_ms: 2_500,
            ..Config::default()
        };
        assert!(config.refresh_interval().is_err());
    }
}
