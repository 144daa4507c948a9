//! Command-line interface definitions.
//!
//! Defines the CLI structure for the pricewatch application using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Crypto price-spike monitor and Telegram bot
#[derive(Parser, Debug)]
#[command(name = "pricewatch")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (optional; defaults apply when absent)
    #[arg(short, long, global = true, default_value = "pricewatch.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor on its interval and serve chat commands until Ctrl-C
    Run(RunArgs),
    /// Run a single monitoring cycle and print its report
    Once(OnceArgs),
    /// Show the newest stored samples of an asset
    History(HistoryArgs),
    /// Wipe samples, tracked assets and the alert log (subscriptions survive)
    Reset(ResetArgs),
    /// Validate configuration and print a summary
    Check,
}

/// Arguments for `run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Do not serve chat commands; alerts are still delivered
    #[arg(long)]
    pub no_bot: bool,
}

/// Arguments for `once`.
#[derive(Args, Debug, Default)]
pub struct OnceArgs {
    /// Log alerts instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Gateway id of the asset, e.g. `bitcoin`
    pub asset: String,

    /// Maximum rows to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

/// Arguments for `reset`.
#[derive(Args, Debug, Default)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
