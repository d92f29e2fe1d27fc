// Dashboard backend HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, bearer-token
// injection, and response parsing. Endpoint groups (auth, drones) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// The backend reads the bearer token from a nonstandard `Auth` header.
const AUTH_HEADER: &str = "Auth";

/// Raw HTTP client for the dashboard backend.
///
/// Holds the session bearer token and attaches it to every request.
/// All methods return the parsed payload -- HTTP 401 surfaces as
/// [`Error::SessionExpired`] and non-2xx responses as [`Error::Api`]
/// carrying the backend's `message` field.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token for the current session. Captured on login and
    /// rotated via [`set_token`](Self::set_token) when a persisted
    /// session is restored.
    token: RwLock<Option<SecretString>>,
}

impl DashboardClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the backend root (e.g. `https://ops.example.net`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install a session token (restored from persisted state or
    /// captured by a login flow).
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Drop the session token (logout).
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a session token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Apply the stored token to a request builder.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.header(
                AUTH_HEADER,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for a backend path.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let full = format!("{base}/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the response body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.apply_auth(self.http.get(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.parse_body(resp).await
    }

    /// Send a POST request with JSON body and parse the response body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.apply_auth(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.parse_body(resp).await
    }

    /// Parse a response body, mapping the backend's failure modes:
    /// HTTP 401 -> `SessionExpired`, non-JSON -> `Deserialization`,
    /// other non-2xx -> `Api` with the payload's `message` field.
    async fn parse_body<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        if !status.is_success() {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .map_or_else(
                    || format!("HTTP {}", status.as_u16()),
                    std::borrow::ToOwned::to_owned,
                );
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
