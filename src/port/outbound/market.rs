//! Market data port.

use async_trait::async_trait;

use crate::domain::{AssetId, AssetRef, MarketSnapshot};
use crate::error::Result;

/// Source of current market snapshots.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// The `n` highest-ranked assets by market capitalization.
    async fn fetch_top_assets(&self, n: usize) -> Result<Vec<MarketSnapshot>>;

    /// Snapshots for an explicit set of assets, fetched in one batch.
    ///
    /// An empty result is an error: callers treat it as "temporarily
    /// unavailable", never as "no such assets".
    async fn fetch_snapshot(&self, ids: &[AssetId]) -> Result<Vec<MarketSnapshot>>;

    /// Resolve free-form user input (id, symbol or name) to an asset.
    async fn resolve_asset(&self, query: &str) -> Result<Option<AssetRef>>;
}
