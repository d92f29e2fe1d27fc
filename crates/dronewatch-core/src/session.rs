// ── Session state ──
//
// Identity of the authenticated operator plus the bearer token the
// gateway attaches to every request. Lifecycle is login to logout;
// persistence across reloads lives in `dronewatch-config`.

use secrecy::SecretString;

/// An authenticated dashboard session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub token: SecretString,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        token: SecretString,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            token,
        }
    }
}
