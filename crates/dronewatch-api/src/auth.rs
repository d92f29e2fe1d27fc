// Dashboard authentication
//
// Username/password login and registration. The login endpoint returns
// a bearer token in its payload; on success the token is installed on
// the client so subsequent requests carry it automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::DashboardClient;
use crate::error::Error;
use crate::types::AuthResponse;

impl DashboardClient {
    /// Authenticate with the backend using username/password.
    ///
    /// On success the returned bearer token is stored on the client and
    /// used for all subsequent requests. A `status: false` payload is an
    /// auth-flow rejection (wrong credentials), not a session failure.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        let url = self.api_url("/dashboard/login");
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp: AuthResponse = self.post(url, &body).await?;

        if !resp.status {
            return Err(Error::Authentication {
                message: resp.message,
            });
        }

        match resp.data.token.as_deref() {
            Some(token) => self.set_token(SecretString::from(token.to_owned())),
            None => {
                return Err(Error::Authentication {
                    message: "login succeeded but no token was issued".into(),
                });
            }
        }

        debug!("login successful");
        Ok(resp)
    }

    /// Register a new account.
    ///
    /// Registration does not issue a token -- callers log in afterwards.
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        let url = self.api_url("/dashboard/register");
        debug!("registering at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp: AuthResponse = self.post(url, &body).await?;

        if !resp.status {
            return Err(Error::Authentication {
                message: resp.message,
            });
        }

        Ok(resp)
    }
}
