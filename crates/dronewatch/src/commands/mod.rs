//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod auth;
pub mod units;
pub mod watch;

use dronewatch_api::DashboardClient;
use dronewatch_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: DashboardClient,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login { username } => auth::login(&client, &username).await,
        Command::Register { username } => auth::register(&client, &username).await,
        Command::Units { serial } => units::handle(client, serial, global).await,
        Command::Watch { interval } => watch::handle(client, config, interval).await,
        // Logout is handled before dispatch -- it needs no client.
        Command::Logout => unreachable!(),
    }
}
