//! Per-asset alert rate limiting.
//!
//! The limiter keeps no counters of its own: it asks the alert log how
//! many alerts went out inside the trailing window, so its state survives
//! restarts.

use crate::domain::time::HOUR_MS;
use crate::domain::AssetId;
use crate::error::Result;
use crate::port::outbound::store::AlertLog;

/// Caps alerts to `max_alerts` per asset within a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRateLimiter {
    max_alerts: usize,
    window_ms: i64,
}

impl AlertRateLimiter {
    #[must_use]
    pub const fn new(max_alerts: usize, window_ms: i64) -> Self {
        Self {
            max_alerts,
            window_ms,
        }
    }

    /// `max_alerts` per rolling hour.
    #[must_use]
    pub const fn per_hour(max_alerts: usize) -> Self {
        Self::new(max_alerts, HOUR_MS)
    }

    #[must_use]
    pub const fn max_alerts(&self) -> usize {
        self.max_alerts
    }

    /// True when fewer than `max_alerts` were recorded for `asset` inside
    /// `[now - window, now]`. Rows stamped after `now` are not counted.
    ///
    /// # Errors
    /// Returns an error if the alert log cannot be queried.
    pub async fn can_alert<L>(&self, log: &L, asset: &AssetId, now: i64) -> Result<bool>
    where
        L: AlertLog,
    {
        let sent = log
            .count_alerts_between(asset, now - self.window_ms, now)
            .await?;
        Ok(sent < self.max_alerts)
    }
}

impl Default for AlertRateLimiter {
    fn default() -> Self {
        Self::per_hour(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::MINUTE_MS;
    use crate::domain::SentAlert;
    use crate::testkit::store::memory_store;

    const NOW: i64 = 1_700_000_000_000;

    async fn record(store: &impl AlertLog, asset: &str, ts: i64) {
        store
            .record_alert(&SentAlert {
                asset_id: AssetId::new(asset),
                message: "spike".into(),
                timestamp: ts,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn third_alert_in_window_closes_the_gate() {
        let store = memory_store();
        let limiter = AlertRateLimiter::default();
        let asset = AssetId::new("x");

        record(&store, "x", NOW - 30 * MINUTE_MS).await;
        record(&store, "x", NOW - 20 * MINUTE_MS).await;
        assert!(limiter.can_alert(&store, &asset, NOW).await.unwrap());

        record(&store, "x", NOW - 10 * MINUTE_MS).await;
        assert!(!limiter.can_alert(&store, &asset, NOW).await.unwrap());

        record(&store, "x", NOW).await;
        assert!(!limiter.can_alert(&store, &asset, NOW).await.unwrap());
    }

    #[tokio::test]
    async fn gate_reopens_once_oldest_alert_leaves_window() {
        let store = memory_store();
        let limiter = AlertRateLimiter::default();
        let asset = AssetId::new("x");
        for minutes_ago in [30, 20, 10] {
            record(&store, "x", NOW - minutes_ago * MINUTE_MS).await;
        }

        // Oldest alert sits exactly on the inclusive boundary.
        let boundary = NOW - 30 * MINUTE_MS + HOUR_MS;
        assert!(!limiter.can_alert(&store, &asset, boundary).await.unwrap());
        assert!(limiter.can_alert(&store, &asset, boundary + 1).await.unwrap());
    }

    #[tokio::test]
    async fn alerts_stamped_after_now_are_not_counted() {
        let store = memory_store();
        let limiter = AlertRateLimiter::default();
        let asset = AssetId::new("x");
        record(&store, "x", NOW - 10 * MINUTE_MS).await;
        for minutes_ahead in [1, 2] {
            record(&store, "x", NOW + minutes_ahead * MINUTE_MS).await;
        }

        assert!(limiter.can_alert(&store, &asset, NOW).await.unwrap());
        assert!(!limiter
            .can_alert(&store, &asset, NOW + 2 * MINUTE_MS)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn limits_are_per_asset() {
        let store = memory_store();
        let limiter = AlertRateLimiter::per_hour(1);
        record(&store, "x", NOW).await;

        assert!(!limiter.can_alert(&store, &AssetId::new("x"), NOW).await.unwrap());
        assert!(limiter.can_alert(&store, &AssetId::new("y"), NOW).await.unwrap());
    }

    #[test]
    fn default_is_three_per_hour() {
        let limiter = AlertRateLimiter::default();
        assert_eq!(limiter.max_alerts(), 3);
        assert_eq!(limiter, AlertRateLimiter::new(3, HOUR_MS));
    }
}
