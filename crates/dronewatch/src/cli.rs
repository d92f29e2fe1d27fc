//! Command-line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};

use dronewatch_core::RefreshInterval;

#[derive(Debug, Parser)]
#[command(
    name = "dronewatch",
    about = "Live dashboard for the drone monitoring platform",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides the config file).
    #[arg(long, global = true, env = "DRONEWATCH_SERVER_URL")]
    pub server: Option<String>,

    /// Output format for listing commands.
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Accept self-signed TLS certificates.
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
    Plain,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session
    Login {
        username: String,
    },

    /// Register a new operator account
    Register {
        username: String,
    },

    /// Clear the persisted session
    Logout,

    /// One-shot poll: list all active units, or show one unit's detail
    Units {
        /// Show the detail view for this serial instead of the roster.
        serial: Option<String>,
    },

    /// Poll continuously and render live unit state until Ctrl-C
    Watch {
        /// Polling cadence: off, 1s, 3s, 5s, 10s, 30s, 1m, 5m, 10m.
        #[arg(long, short = 'i', value_parser = parse_interval)]
        interval: Option<RefreshInterval>,
    },
}

fn parse_interval(s: &str) -> Result<RefreshInterval, String> {
    s.parse()
}
