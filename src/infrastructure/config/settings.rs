//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from an optional TOML file, then environment
//! variables override it. Secrets (`BOT_TOKEN`, `COINGECKO_API_KEY`) are
//! only ever read from the environment.
//!
//! # Example
//!
//! ```no_run
//! use pricewatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("pricewatch.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::database::DatabaseConfig;
use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::coingecko::CoinGeckoConfig;
use crate::error::{ConfigError, Result};

pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_ADMIN_ID: &str = "ADMIN_ID";
pub const ENV_THRESHOLD: &str = "PRICE_CHANGE_THRESHOLD";
pub const ENV_API_KEY: &str = "COINGECKO_API_KEY";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Market data provider settings.
    #[serde(default)]
    pub gateway: CoinGeckoConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telegram: TelegramAppConfig,
}

impl Config {
    /// Parse configuration from TOML content and apply `env` overrides.
    ///
    /// `env` maps a variable name to its value; [`Config::load`] passes
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override cannot be
    /// parsed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, if it exists, and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The TOML content is malformed
    /// - An environment override is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(ConfigError::ReadFile(e).into()),
        };
        Self::parse_toml(&content, |name| {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        })
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_THRESHOLD) {
            let threshold =
                Decimal::from_str(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                    field: ENV_THRESHOLD,
                    reason: format!("`{raw}` is not a number: {e}"),
                })?;
            self.monitor.threshold_percent = Some(threshold);
        }
        if let Some(raw) = env(ENV_ADMIN_ID) {
            let admin_id = raw.trim().parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                field: ENV_ADMIN_ID,
                reason: format!("`{raw}` is not a chat id: {e}"),
            })?;
            self.telegram.admin_id = Some(admin_id);
        }
        if let Some(token) = env(ENV_BOT_TOKEN) {
            self.telegram.bot_token = Some(token.trim().to_string());
        }
        if let Some(key) = env(ENV_API_KEY) {
            self.gateway.api_key = Some(key.trim().to_string());
        }
        if let Some(path) = env(ENV_DATABASE_PATH) {
            self.database.path = path.trim().to_string();
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// The threshold and Telegram credentials are checked by the commands
    /// that need them, see [`Config::require_monitor`].
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.monitor.validate()?;

        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "gateway.base_url",
            }
            .into());
        }
        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.path",
            }
            .into());
        }
        Ok(())
    }

    /// Check everything the monitor needs: a threshold, and Telegram
    /// credentials when Telegram is enabled.
    ///
    /// # Errors
    /// Returns `MissingField` for the first missing value.
    #[allow(clippy::result_large_err)]
    pub fn require_monitor(&self) -> Result<()> {
        self.monitor.threshold()?;
        if self.telegram_active() {
            self.require_telegram()?;
        }
        Ok(())
    }

    /// Bot token and admin chat id.
    ///
    /// # Errors
    /// Returns `MissingField` when either is absent.
    #[allow(clippy::result_large_err)]
    pub fn require_telegram(&self) -> Result<(String, i64)> {
        let token = self
            .telegram
            .bot_token
            .clone()
            .ok_or(ConfigError::MissingField {
                field: ENV_BOT_TOKEN,
            })?;
        let admin_id = self.telegram.admin_id.ok_or(ConfigError::MissingField {
            field: ENV_ADMIN_ID,
        })?;
        Ok((token, admin_id))
    }

    /// True when Telegram is enabled and compiled in.
    #[must_use]
    pub fn telegram_active(&self) -> bool {
        cfg!(feature = "telegram") && self.telegram.enabled
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::logging::LogFormat;
    use rust_decimal_macros::dec;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("", env(&[])).unwrap();

        assert_eq!(config.monitor.interval_secs, 60);
        assert_eq!(config.monitor.top_n, 30);
        assert_eq!(config.monitor.window_limit, 5);
        assert_eq!(config.monitor.alert_limit_per_hour, 3);
        assert_eq!(config.monitor.threshold_percent, None);
        assert_eq!(config.gateway.vs_currency, "usd");
        assert_eq!(config.database.path, "pricewatch.db");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.telegram.enabled);
    }

    #[test]
    fn file_values_are_read() {
        let toml = r#"
            [logging]
            level = "debug"
            format = "json"

            [monitor]
            interval_secs = 30
            top_n = 10
            threshold_percent = "4.5"

            [gateway]
            base_url = "http://localhost:9000"

            [database]
            path = "/tmp/prices.db"

            [telegram]
            enabled = false
        "#;

        let config = Config::parse_toml(toml, env(&[])).unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.monitor.interval_secs, 30);
        assert_eq!(config.monitor.threshold_percent, Some(dec!(4.5)));
        assert_eq!(config.gateway.base_url, "http://localhost:9000");
        assert_eq!(config.database.path, "/tmp/prices.db");
        assert!(!config.telegram.enabled);
    }

    #[test]
    fn environment_overrides_file() {
        let toml = "[monitor]\nthreshold_percent = \"4.5\"\n";

        let config = Config::parse_toml(
            toml,
            env(&[
                (ENV_THRESHOLD, "7"),
                (ENV_ADMIN_ID, "-100123"),
                (ENV_BOT_TOKEN, "123:abc"),
                (ENV_API_KEY, "demo"),
                (ENV_DATABASE_PATH, "other.db"),
            ]),
        )
        .unwrap();

        assert_eq!(config.monitor.threshold_percent, Some(dec!(7)));
        assert_eq!(config.telegram.admin_id, Some(-100_123));
        assert_eq!(config.gateway.api_key.as_deref(), Some("demo"));
        assert_eq!(config.database.path, "other.db");
        assert_eq!(
            config.require_telegram().unwrap(),
            ("123:abc".to_string(), -100_123)
        );
    }

    #[test]
    fn unparsable_threshold_is_rejected() {
        let err = Config::parse_toml("", env(&[(ENV_THRESHOLD, "five")])).unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: ENV_THRESHOLD,
                ..
            })
        ));
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        for raw in ["0", "-3"] {
            let err = Config::parse_toml("", env(&[(ENV_THRESHOLD, raw)])).unwrap_err();
            assert!(matches!(
                err,
                Error::Config(ConfigError::InvalidValue {
                    field: "threshold_percent",
                    ..
                })
            ));
        }
    }

    #[test]
    fn missing_threshold_fails_monitor_requirements() {
        let config = Config::parse_toml("[telegram]\nenabled = false\n", env(&[])).unwrap();

        let err = config.require_monitor().unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                field: ENV_THRESHOLD
            })
        ));
    }

    #[test]
    fn invalid_admin_id_is_rejected() {
        let err = Config::parse_toml("", env(&[(ENV_ADMIN_ID, "@admin")])).unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: ENV_ADMIN_ID,
                ..
            })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Config::parse_toml("[monitor]\ninterval_secs = 0\n", env(&[])).unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("[monitor\n", env(&[])).unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn settings_carry_windows_in_milliseconds() {
        let config = Config::parse_toml("", env(&[(ENV_THRESHOLD, "5")])).unwrap();

        let settings = config.monitor.to_settings().unwrap();

        assert_eq!(settings.threshold_percent, dec!(5));
        assert_eq!(settings.window_ms, 300_000);
        assert_eq!(settings.alert_retention_ms, 24 * 3_600_000);
    }
}
