//! CoinGecko response payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::domain::{AssetId, AssetRef, MarketSnapshot};

/// Row of `GET /coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub current_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price_change_percentage_1h_in_currency: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price_change_percentage_24h_in_currency: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price_change_percentage_24h: Option<Decimal>,
}

/// Read a JSON number as a decimal. Values a `Decimal` cannot hold (or
/// that are not numbers) become `None` so one bad row never fails the
/// whole batch.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => {
            let raw = number.to_string();
            let parsed = raw
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok();
            if parsed.is_none() {
                warn!(value = %raw, "Ignoring market value outside decimal range");
            }
            parsed
        }
        Some(other) => {
            warn!(value = %other, "Ignoring non-numeric market value");
            None
        }
    })
}

impl CoinMarket {
    /// Convert to a snapshot, dropping rows without a usable price.
    #[must_use]
    pub fn into_snapshot(self) -> Option<MarketSnapshot> {
        let price = match self.current_price {
            Some(price) if price > Decimal::ZERO => price,
            other => {
                warn!(asset = %self.id, price = ?other, "Dropping market row without a positive price");
                return None;
            }
        };

        Some(MarketSnapshot {
            id: AssetId::new(&self.id),
            symbol: self.symbol,
            name: self.name,
            price,
            change_1h: self.price_change_percentage_1h_in_currency,
            change_24h: self
                .price_change_percentage_24h_in_currency
                .or(self.price_change_percentage_24h),
        })
    }
}

/// Row of `GET /coins/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl From<&CoinListEntry> for AssetRef {
    fn from(entry: &CoinListEntry) -> Self {
        Self {
            id: AssetId::new(&entry.id),
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
        }
    }
}

/// Match a trimmed, case-insensitive query against id, then symbol, then name.
#[must_use]
pub fn find_coin<'a>(list: &'a [CoinListEntry], query: &str) -> Option<&'a CoinListEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    list.iter()
        .find(|c| c.id.to_lowercase() == needle)
        .or_else(|| list.iter().find(|c| c.symbol.to_lowercase() == needle))
        .or_else(|| list.iter().find(|c| c.name.to_lowercase() == needle))
}
