//! Monitoring cycle configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::monitor::MonitorSettings;
use crate::domain::time::HOUR_MS;
use crate::error::{ConfigError, Result};

/// `[monitor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between cycle starts (default: 60).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Top-ranked assets always monitored (default: 30).
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Detection window lookback in seconds (default: 300).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Maximum samples in the detection window (default: 5).
    #[serde(default = "default_window_limit")]
    pub window_limit: usize,
    /// Alerts per asset per rolling hour (default: 3).
    #[serde(default = "default_alert_limit_per_hour")]
    pub alert_limit_per_hour: usize,
    #[serde(default = "default_retention_hours")]
    pub alert_retention_hours: u64,
    #[serde(default = "default_retention_hours")]
    pub sample_retention_hours: u64,
    /// Spike threshold in percent. No default; `PRICE_CHANGE_THRESHOLD`
    /// overrides it.
    #[serde(default)]
    pub threshold_percent: Option<Decimal>,
}

const fn default_interval_secs() -> u64 {
    60
}

const fn default_top_n() -> usize {
    30
}

const fn default_window_secs() -> u64 {
    300
}

const fn default_window_limit() -> usize {
    5
}

const fn default_alert_limit_per_hour() -> usize {
    3
}

const fn default_retention_hours() -> u64 {
    24
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            top_n: default_top_n(),
            window_secs: default_window_secs(),
            window_limit: default_window_limit(),
            alert_limit_per_hour: default_alert_limit_per_hour(),
            alert_retention_hours: default_retention_hours(),
            sample_retention_hours: default_retention_hours(),
            threshold_percent: None,
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// The configured threshold.
    ///
    /// # Errors
    /// Returns `MissingField` when no threshold is configured.
    pub fn threshold(&self) -> Result<Decimal> {
        self.threshold_percent.ok_or_else(|| {
            ConfigError::MissingField {
                field: "PRICE_CHANGE_THRESHOLD",
            }
            .into()
        })
    }

    /// Settings for the monitoring cycle.
    ///
    /// # Errors
    /// Returns an error when the threshold is missing.
    pub fn to_settings(&self) -> Result<MonitorSettings> {
        Ok(MonitorSettings {
            threshold_percent: self.threshold()?,
            top_n: self.top_n,
            window_ms: secs_to_ms(self.window_secs),
            window_limit: self.window_limit,
            alert_limit_per_hour: self.alert_limit_per_hour,
            alert_retention_ms: hours_to_ms(self.alert_retention_hours),
            sample_retention_ms: hours_to_ms(self.sample_retention_hours),
        })
    }

    pub(super) fn validate(&self) -> Result<()> {
        let positive: [(&'static str, u64); 7] = [
            ("interval_secs", self.interval_secs),
            ("top_n", self.top_n as u64),
            ("window_secs", self.window_secs),
            ("window_limit", self.window_limit as u64),
            ("alert_limit_per_hour", self.alert_limit_per_hour as u64),
            ("alert_retention_hours", self.alert_retention_hours),
            ("sample_retention_hours", self.sample_retention_hours),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        if let Some(threshold) = self.threshold_percent {
            if threshold <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "threshold_percent",
                    reason: format!("must be greater than 0, got {threshold}"),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn secs_to_ms(secs: u64) -> i64 {
    i64::try_from(secs).map_or(i64::MAX, |s| s.saturating_mul(1_000))
}

fn hours_to_ms(hours: u64) -> i64 {
    i64::try_from(hours).map_or(i64::MAX, |h| h.saturating_mul(HOUR_MS))
}
