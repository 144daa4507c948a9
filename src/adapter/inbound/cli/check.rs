//! Handler for the `check` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate configuration without starting the monitor.
///
/// # Errors
/// Returns an error if anything `run` needs is missing.
pub fn execute(config_path: &Path, config: &Config) -> Result<()> {
    output::section("Configuration Check");
    if config_path.exists() {
        output::field("Config", config_path.display());
    } else {
        output::field("Config", "defaults (file not found)");
    }

    output::section("Summary");
    output::field("Database", &config.database.path);
    output::field("Gateway", &config.gateway.base_url);
    output::field(
        "API key",
        if config.gateway.api_key.is_some() {
            "set"
        } else {
            "not set"
        },
    );
    output::field("Interval", format!("{}s", config.monitor.interval_secs));
    output::field("Top assets", config.monitor.top_n);
    output::field(
        "Alert limit",
        format!("{} per hour", config.monitor.alert_limit_per_hour),
    );
    match config.monitor.threshold_percent {
        Some(threshold) => output::field("Threshold", format!("{threshold}%")),
        None => output::warning("PRICE_CHANGE_THRESHOLD is not set"),
    }
    if config.telegram_active() {
        if config.telegram.bot_token.is_none() {
            output::warning("Telegram enabled but BOT_TOKEN is not set");
        }
        if config.telegram.admin_id.is_none() {
            output::warning("Telegram enabled but ADMIN_ID is not set");
        }
    } else {
        output::field("Telegram", "disabled");
    }

    config.require_monitor()?;
    output::success("Configuration check complete");
    Ok(())
}
