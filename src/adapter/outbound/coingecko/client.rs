//! CoinGecko REST API client.
//!
//! Uses two endpoints:
//! - `/coins/markets` for ranked and explicit-id snapshots
//! - `/coins/list` for resolving user input to a provider id
//!
//! Requests are not retried; the next monitoring cycle is the retry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::dto::{find_coin, CoinListEntry, CoinMarket};
use super::settings::CoinGeckoConfig;
use crate::domain::{AssetId, AssetRef, MarketSnapshot};
use crate::error::{GatewayError, Result};
use crate::port::outbound::market::MarketDataGateway;

/// Cached copy of the provider's asset directory.
struct CoinListCache {
    fetched_at: Instant,
    entries: Arc<Vec<CoinListEntry>>,
}

/// HTTP client for the CoinGecko market API.
pub struct CoinGeckoClient {
    http: HttpClient,
    base_url: String,
    vs_currency: String,
    api_key: Option<String>,
    coin_list_ttl: Duration,
    coin_list: RwLock<Option<CoinListCache>>,
}

impl CoinGeckoClient {
    #[must_use]
    pub fn from_config(config: &CoinGeckoConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            vs_currency: config.vs_currency.clone(),
            api_key: config.api_key.clone(),
            coin_list_ttl: Duration::from_secs(config.coin_list_ttl_secs),
            coin_list: RwLock::new(None),
        }
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .query(query)
            .header("accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await.map_err(GatewayError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let parsed = response.json::<T>().await.map_err(GatewayError::from)?;
        Ok(parsed)
    }

    fn markets_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("price_change_percentage", "1h,24h".to_string()),
        ]
    }

    async fn coin_list(&self) -> Result<Arc<Vec<CoinListEntry>>> {
        let cached = self
            .coin_list
            .read()
            .as_ref()
            .filter(|cache| cache.fetched_at.elapsed() < self.coin_list_ttl)
            .map(|cache| Arc::clone(&cache.entries));
        if let Some(entries) = cached {
            return Ok(entries);
        }

        let entries: Vec<CoinListEntry> = self.get_json("/coins/list", &[]).await?;
        debug!(count = entries.len(), "Fetched coin list");
        let entries = Arc::new(entries);

        *self.coin_list.write() = Some(CoinListCache {
            fetched_at: Instant::now(),
            entries: Arc::clone(&entries),
        });

        Ok(entries)
    }
}

fn into_snapshots(rows: Vec<CoinMarket>) -> Vec<MarketSnapshot> {
    rows.into_iter().filter_map(CoinMarket::into_snapshot).collect()
}

#[async_trait]
impl MarketDataGateway for CoinGeckoClient {
    async fn fetch_top_assets(&self, n: usize) -> Result<Vec<MarketSnapshot>> {
        let mut query = self.markets_query();
        query.push(("order", "market_cap_desc".to_string()));
        query.push(("per_page", n.to_string()));
        query.push(("page", "1".to_string()));

        let rows: Vec<CoinMarket> = self.get_json("/coins/markets", &query).await?;
        info!(requested = n, received = rows.len(), "Fetched top assets");

        let snapshots = into_snapshots(rows);
        if snapshots.is_empty() {
            return Err(GatewayError::Empty { requested: n }.into());
        }
        Ok(snapshots)
    }

    async fn fetch_snapshot(&self, ids: &[AssetId]) -> Result<Vec<MarketSnapshot>> {
        if ids.is_empty() {
            return Err(GatewayError::Empty { requested: 0 }.into());
        }

        let joined = ids
            .iter()
            .map(AssetId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let mut query = self.markets_query();
        query.push(("ids", joined));
        query.push(("per_page", ids.len().max(1).to_string()));

        let rows: Vec<CoinMarket> = self.get_json("/coins/markets", &query).await?;
        debug!(requested = ids.len(), received = rows.len(), "Fetched snapshot batch");

        let snapshots = into_snapshots(rows);
        if snapshots.is_empty() {
            return Err(GatewayError::Empty {
                requested: ids.len(),
            }
            .into());
        }
        Ok(snapshots)
    }

    async fn resolve_asset(&self, query: &str) -> Result<Option<AssetRef>> {
        let list = self.coin_list().await?;
        Ok(find_coin(&list, query).map(AssetRef::from))
    }
}
