mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dronewatch_api::{DashboardClient, TransportConfig};
use dronewatch_config::SessionStore;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Logout only touches the persisted session.
        Command::Logout => commands::auth::logout(),

        cmd => {
            let config = load_config(&cli.global)?;
            let client = build_client(&config)?;

            // Restore the persisted session so requests carry the token.
            if let Some(session) = SessionStore::new().load()? {
                client.set_token(session.token);
            }

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, client, &config, &cli.global).await
        }
    }
}

/// Load config and apply CLI flag overrides.
fn load_config(global: &GlobalOpts) -> Result<dronewatch_config::Config, CliError> {
    let mut config = dronewatch_config::load_config()?;
    if let Some(ref server) = global.server {
        config.server_url.clone_from(server);
    }
    if global.insecure {
        config.insecure = true;
    }
    Ok(config)
}

fn build_client(config: &dronewatch_config::Config) -> Result<DashboardClient, CliError> {
    let url: url::Url = config
        .server_url
        .parse()
        .map_err(|_| CliError::Validation {
            field: "server_url".into(),
            reason: format!("invalid URL: {}", config.server_url),
        })?;

    let transport = TransportConfig {
        timeout: std::time::Duration::from_secs(config.timeout),
        accept_invalid_certs: config.insecure,
    };

    Ok(DashboardClient::new(url, &transport)?)
}
