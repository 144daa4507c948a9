//! Handler for the `reset` command.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::adapter::inbound::cli::command::ResetArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Wipe stored history after confirmation.
///
/// # Errors
/// Returns an error if the prompt fails or the wipe is rejected.
pub fn execute(config: &Config, args: &ResetArgs) -> Result<()> {
    if !args.yes {
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete all samples and alerts in {}? Subscriptions are kept",
                config.database.path
            ))
            .default(false)
            .interact()?;
        if !proceed {
            output::warning("Reset cancelled");
            return Ok(());
        }
    }

    let store = bootstrap::open_store(config)?;
    let deleted = store.reset_history()?;
    output::success(&format!("Deleted {deleted} row(s)"));
    Ok(())
}
