//! CLI command implementations.

pub mod clear;
pub mod config;
pub mod delete;
pub mod generate;
pub mod list;
pub mod watch;

use clap::{Args, Subcommand};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Length hint passed to the provider (default: fetch.default_length).
    pub length: Option<u32>,

    /// Number of texts to fetch.
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Show only the newest N texts.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Record id.
    pub id: i64,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Also fetch a new text every N seconds.
    #[arg(short, long)]
    pub every: Option<u64>,

    /// Length hint for periodic fetches (default: fetch.default_length).
    #[arg(short, long)]
    pub length: Option<u32>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
