//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::application::monitor::MonitorScheduler;
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, AlertDelivery};
use crate::infrastructure::config::settings::Config;

/// Execute the run command.
///
/// # Errors
/// Returns an error if the configuration is incomplete or the database
/// cannot be opened.
pub async fn execute(config: &Config, args: &RunArgs) -> Result<()> {
    config.require_monitor()?;

    let store = bootstrap::open_store(config)?;
    let gateway = bootstrap::build_gateway(config);
    let notifier = bootstrap::build_notifier(config, false)?;
    let monitor = Arc::new(bootstrap::build_monitor(
        config,
        store.clone(),
        Arc::clone(&gateway),
        notifier,
    )?);

    print_startup(config, args);

    let scheduler = MonitorScheduler::new(monitor, config.monitor.interval()).start();
    let chat = spawn_chat(config, args, store, gateway).await?;

    signal::ctrl_c().await?;
    info!("Shutdown signal received");

    if let Some(chat) = chat {
        chat.shutdown().await;
    }
    let cycles = scheduler.shutdown().await;
    output::success(&format!("Stopped after {cycles} cycle(s)"));
    Ok(())
}

#[cfg(feature = "telegram")]
async fn spawn_chat(
    config: &Config,
    args: &RunArgs,
    store: crate::adapter::outbound::sqlite::SqliteHistoryStore,
    gateway: Arc<dyn crate::port::outbound::market::MarketDataGateway>,
) -> Result<Option<crate::adapter::inbound::telegram::ChatBot>> {
    use crate::adapter::inbound::telegram::ChatBot;

    if args.no_bot || !config.telegram_active() {
        return Ok(None);
    }
    let (token, _) = config.require_telegram()?;
    let service = Arc::new(bootstrap::build_chat_service(store, gateway));
    Ok(Some(ChatBot::spawn(teloxide::Bot::new(token), service).await))
}

#[cfg(not(feature = "telegram"))]
async fn spawn_chat(
    _config: &Config,
    _args: &RunArgs,
    _store: crate::adapter::outbound::sqlite::SqliteHistoryStore,
    _gateway: Arc<dyn crate::port::outbound::market::MarketDataGateway>,
) -> Result<Option<NoChat>> {
    Ok(None)
}

#[cfg(not(feature = "telegram"))]
struct NoChat;

#[cfg(not(feature = "telegram"))]
impl NoChat {
    async fn shutdown(self) {}
}

fn print_startup(config: &Config, args: &RunArgs) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database.path);
    output::field("Interval", format!("{}s", config.monitor.interval_secs));
    output::field("Top assets", config.monitor.top_n);
    if let Some(threshold) = config.monitor.threshold_percent {
        output::field("Threshold", format!("{threshold}%"));
    }
    let telegram = if !config.telegram_active() {
        "disabled"
    } else if args.no_bot {
        "alerts only"
    } else {
        "alerts and chat"
    };
    output::field("Telegram", telegram);
    if bootstrap::alert_delivery(config, false) == AlertDelivery::LogOnly {
        output::warning("Spike alerts are only written to the log");
    }
    output::success("Monitoring started, press Ctrl-C to stop");
}
