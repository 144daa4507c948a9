//! Persistence ports for price history, subscriptions and the alert log.

use std::future::Future;

use crate::domain::{AssetId, PriceSample, SentAlert, Subscription, UserId};
use crate::error::Result;

/// Append-only per-asset price series.
pub trait PriceHistory: Send + Sync {
    /// Provision the series for an asset. Idempotent.
    fn ensure_asset_tracked(&self, asset: &AssetId) -> impl Future<Output = Result<()>> + Send;

    /// Append one sample. Fails if the asset was never provisioned.
    fn append_sample(&self, sample: &PriceSample) -> impl Future<Output = Result<()>> + Send;

    /// Up to `limit` samples with `timestamp >= since`, newest first.
    fn recent_samples(
        &self,
        asset: &AssetId,
        since: i64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PriceSample>>> + Send;

    /// Delete samples older than `cutoff`. Returns count deleted.
    fn purge_samples_older_than(&self, cutoff: i64) -> impl Future<Output = Result<usize>> + Send;
}

/// User subscriptions to assets.
pub trait SubscriptionStore: Send + Sync {
    /// Add a subscription. Duplicates are a no-op.
    fn add_subscription(&self, subscription: &Subscription)
        -> impl Future<Output = Result<()>> + Send;

    /// Assets a user subscribed to.
    fn list_subscriptions(&self, user: UserId)
        -> impl Future<Output = Result<Vec<AssetId>>> + Send;

    /// Every distinct subscribed asset across all users.
    fn list_all_subscribed_assets(&self) -> impl Future<Output = Result<Vec<AssetId>>> + Send;
}

/// Log of dispatched alerts, used for rate limiting and auditing.
pub trait AlertLog: Send + Sync {
    fn record_alert(&self, alert: &SentAlert) -> impl Future<Output = Result<()>> + Send;

    /// Alerts for `asset` with `since <= timestamp <= until`.
    fn count_alerts_between(
        &self,
        asset: &AssetId,
        since: i64,
        until: i64,
    ) -> impl Future<Output = Result<usize>> + Send;

    /// Delete alerts with `timestamp < cutoff`. Returns count deleted.
    fn purge_alerts_older_than(&self, cutoff: i64) -> impl Future<Output = Result<usize>> + Send;
}
