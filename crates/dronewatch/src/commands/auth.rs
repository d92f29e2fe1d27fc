//! Login, registration, and logout flows.

use dialoguer::Password;
use secrecy::SecretString;

use dronewatch_api::DashboardClient;
use dronewatch_config::SessionStore;
use dronewatch_core::Session;

use crate::error::CliError;

/// Authenticate and persist the session for later invocations.
pub async fn login(client: &DashboardClient, username: &str) -> Result<(), CliError> {
    let password = prompt_password("Password")?;

    let resp = client.login(username, &password).await?;

    let token = resp.data.token.unwrap_or_default();
    let user_id = resp.data.id.unwrap_or_else(|| username.to_owned());
    let session = Session::new(user_id, username, SecretString::from(token));

    SessionStore::new().save(&session)?;

    println!("Logged in as {username}.");
    Ok(())
}

/// Create a new operator account. Does not log in.
pub async fn register(client: &DashboardClient, username: &str) -> Result<(), CliError> {
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;

    use secrecy::ExposeSecret;
    if password.expose_secret() != confirm.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }

    let resp = client.register(username, &password).await?;

    let message = if resp.message.is_empty() {
        "registered".to_owned()
    } else {
        resp.message
    };
    println!("{message} -- log in with: dronewatch login {username}");
    Ok(())
}

/// Drop the persisted session entirely.
pub fn logout() -> Result<(), CliError> {
    SessionStore::new().clear()?;
    println!("Logged out.");
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let raw = Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(std::io::Error::other)?;
    Ok(SecretString::from(raw))
}
