//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::coingecko::CoinGeckoClient;
use crate::adapter::outbound::notifier::LogNotifier;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteHistoryStore};
use crate::application::chat::ChatService;
use crate::application::monitor::Monitor;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::market::MarketDataGateway;
use crate::port::outbound::notifier::AlertNotifier;

/// Open the database and bring its schema up to date.
///
/// # Errors
/// Returns an error if the pool cannot be created or a migration fails.
pub fn open_store(config: &Config) -> Result<SqliteHistoryStore> {
    let pool = create_pool(&config.database.path)?;
    run_migrations(&pool)?;
    info!(path = %config.database.path, "Database ready");
    Ok(SqliteHistoryStore::new(pool))
}

/// Market data gateway from the `[gateway]` section.
#[must_use]
pub fn build_gateway(config: &Config) -> Arc<dyn MarketDataGateway> {
    Arc::new(CoinGeckoClient::from_config(&config.gateway))
}

/// Where spike alerts end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDelivery {
    Telegram,
    /// Requested dry run; alerts are logged.
    DryRun,
    /// Telegram is disabled or not compiled in; nobody receives alerts.
    LogOnly,
}

#[must_use]
pub fn alert_delivery(config: &Config, dry_run: bool) -> AlertDelivery {
    if dry_run {
        AlertDelivery::DryRun
    } else if config.telegram_active() {
        AlertDelivery::Telegram
    } else {
        AlertDelivery::LogOnly
    }
}

/// Alert notifier: Telegram when active, the log otherwise or on dry runs.
///
/// # Errors
/// Returns an error if Telegram is active but its credentials are missing.
#[allow(clippy::result_large_err)]
pub fn build_notifier(config: &Config, dry_run: bool) -> Result<Arc<dyn AlertNotifier>> {
    match alert_delivery(config, dry_run) {
        AlertDelivery::Telegram => telegram_notifier(config),
        AlertDelivery::DryRun => {
            info!("Dry run, alerts will be written to the log");
            Ok(Arc::new(LogNotifier))
        }
        AlertDelivery::LogOnly => {
            warn!("Telegram is disabled, spike alerts are only written to the log and reach no one");
            Ok(Arc::new(LogNotifier))
        }
    }
}

#[cfg(feature = "telegram")]
fn telegram_notifier(config: &Config) -> Result<Arc<dyn AlertNotifier>> {
    let (bot_token, admin_chat_id) = config.require_telegram()?;
    info!(chat_id = admin_chat_id, "Alerts will be sent to Telegram");
    Ok(Arc::new(TelegramNotifier::new(&TelegramConfig {
        bot_token,
        admin_chat_id,
    })))
}

#[cfg(not(feature = "telegram"))]
fn telegram_notifier(_config: &Config) -> Result<Arc<dyn AlertNotifier>> {
    Ok(Arc::new(LogNotifier))
}

/// Monitor wired to the given adapters.
///
/// # Errors
/// Returns an error when no spike threshold is configured.
#[allow(clippy::result_large_err)]
pub fn build_monitor(
    config: &Config,
    store: SqliteHistoryStore,
    gateway: Arc<dyn MarketDataGateway>,
    notifier: Arc<dyn AlertNotifier>,
) -> Result<Monitor<SqliteHistoryStore>> {
    let settings = config.monitor.to_settings()?;
    Ok(Monitor::new(store, gateway, notifier, settings))
}

/// Chat use cases sharing the monitor's store and gateway.
#[must_use]
pub fn build_chat_service(
    store: SqliteHistoryStore,
    gateway: Arc<dyn MarketDataGateway>,
) -> ChatService<SqliteHistoryStore> {
    ChatService::new(store, gateway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    fn config(toml: &str) -> Config {
        Config::parse_toml(toml, |_| None).unwrap()
    }

    #[test]
    fn open_store_migrates_in_memory_database() {
        let config = config("[database]\npath = \":memory:\"\n");

        let store = open_store(&config).unwrap();

        assert!(store.list_tracked_assets().unwrap().is_empty());
    }

    #[test]
    fn build_monitor_requires_threshold() {
        let config = config("[database]\npath = \":memory:\"\n");
        let store = open_store(&config).unwrap();

        let result = build_monitor(
            &config,
            store,
            build_gateway(&config),
            Arc::new(LogNotifier),
        );

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { .. }))
        ));
    }

    #[test]
    fn disabled_telegram_means_log_only_delivery() {
        let config = config("[telegram]\nenabled = false\n");

        assert_eq!(alert_delivery(&config, false), AlertDelivery::LogOnly);
        assert_eq!(alert_delivery(&config, true), AlertDelivery::DryRun);
        assert!(build_notifier(&config, false).is_ok());
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn enabled_telegram_delivers_to_telegram() {
        let config = config("");

        assert_eq!(alert_delivery(&config, false), AlertDelivery::Telegram);
        assert_eq!(alert_delivery(&config, true), AlertDelivery::DryRun);
    }

    #[test]
    fn dry_run_never_needs_telegram_credentials() {
        let config = config("");

        assert!(build_notifier(&config, true).is_ok());
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn active_telegram_without_token_is_an_error() {
        let config = config("[telegram]\nenabled = true\n");

        assert!(build_notifier(&config, false).is_err());
    }
}
