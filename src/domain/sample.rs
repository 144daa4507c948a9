//! Price observations and market snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::AssetId;

/// One timestamped price observation for an asset.
///
/// Samples are append-only: they are never mutated once written and are
/// only removed by the retention sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub asset_id: AssetId,
    /// Price in the quote currency. Always positive.
    pub price: Decimal,
    /// Provider-computed 1-hour change in percent.
    pub change_1h: Option<Decimal>,
    /// Provider-computed 24-hour change in percent.
    pub change_24h: Option<Decimal>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Current market data for one asset as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change_1h: Option<Decimal>,
    pub change_24h: Option<Decimal>,
}

impl MarketSnapshot {
    /// Turn this snapshot into a sample observed at `timestamp`.
    #[must_use]
    pub fn to_sample(&self, timestamp: i64) -> PriceSample {
        PriceSample {
            asset_id: self.id.clone(),
            price: self.price,
            change_1h: self.change_1h,
            change_24h: self.change_24h,
            timestamp,
        }
    }
}

/// Entry of the provider's asset directory, used to resolve user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
}
