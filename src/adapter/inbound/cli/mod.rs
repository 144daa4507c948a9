//! Command-line interface.

pub mod check;
pub mod command;
pub mod history;
pub mod once;
pub mod output;
pub mod reset;
pub mod run;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use command::{Cli, Commands};

/// Execute a parsed command line.
///
/// # Errors
/// Returns the first error raised by the command.
pub async fn execute(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&config, &args).await,
        Commands::Once(args) => once::execute(&config, &args).await,
        Commands::History(args) => history::execute(&config, &args).await,
        Commands::Reset(args) => reset::execute(&config, &args),
        Commands::Check => check::execute(&cli.config, &config),
    }
}
