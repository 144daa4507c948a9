//! Builders for domain values used across tests.

use rust_decimal::Decimal;

use crate::domain::{AssetId, AssetRef, MarketSnapshot, PriceSample};

/// Snapshot with `symbol` and `name` derived from the id.
pub fn snapshot(id: &str, price: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        id: AssetId::new(id),
        symbol: id.chars().take(3).collect(),
        name: id.to_string(),
        price,
        change_1h: None,
        change_24h: None,
    }
}

/// Snapshot carrying a provider 1-hour change.
pub fn snapshot_with_change(id: &str, price: Decimal, change_1h: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        change_1h: Some(change_1h),
        ..snapshot(id, price)
    }
}

/// Sample without percent changes.
pub fn sample(id: &str, price: Decimal, timestamp: i64) -> PriceSample {
    PriceSample {
        asset_id: AssetId::new(id),
        price,
        change_1h: None,
        change_24h: None,
        timestamp,
    }
}

/// Directory entry for lookups.
pub fn asset_ref(id: &str, symbol: &str, name: &str) -> AssetRef {
    AssetRef {
        id: AssetId::new(id),
        symbol: symbol.to_string(),
        name: name.to_string(),
    }
}
