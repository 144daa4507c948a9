//! Scripted in-memory market data gateway.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{AssetId, AssetRef, MarketSnapshot};
use crate::error::{GatewayError, Result};
use crate::port::outbound::market::MarketDataGateway;

#[derive(Default)]
struct Script {
    /// Every market the gateway knows, in ranking order.
    markets: Vec<MarketSnapshot>,
    directory: Vec<AssetRef>,
}

/// Gateway whose market is set by the test.
///
/// `fetch_top_assets` returns the first `n` known markets and
/// `fetch_snapshot` returns the requested ones that are known, in
/// ranking order.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
    fail_snapshots: Arc<AtomicBool>,
    snapshot_calls: Arc<AtomicUsize>,
    requested: Arc<Mutex<Vec<Vec<AssetId>>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl ScriptedGateway {
    pub fn new(markets: Vec<MarketSnapshot>) -> Self {
        let gateway = Self::default();
        gateway.script.lock().markets = markets;
        gateway
    }

    /// Replace a known market in place, or append a new one.
    pub fn set_market(&self, snapshot: MarketSnapshot) {
        let mut script = self.script.lock();
        match script.markets.iter_mut().find(|m| m.id == snapshot.id) {
            Some(existing) => *existing = snapshot,
            None => script.markets.push(snapshot),
        }
    }

    /// Update only the price of a known market.
    pub fn set_price(&self, id: &str, price: Decimal) {
        let id = AssetId::new(id);
        if let Some(existing) = self.script.lock().markets.iter_mut().find(|m| m.id == id) {
            existing.price = price;
        }
    }

    pub fn set_directory(&self, directory: Vec<AssetRef>) {
        self.script.lock().directory = directory;
    }

    pub fn fail_snapshots(&self, fail: bool) {
        self.fail_snapshots.store(fail, Ordering::SeqCst);
    }

    /// Delay every top-assets call to simulate a slow network.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    /// Id batches passed to `fetch_snapshot`, in call order.
    pub fn requested_batches(&self) -> Vec<Vec<AssetId>> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl MarketDataGateway for ScriptedGateway {
    async fn fetch_top_assets(&self, n: usize) -> Result<Vec<MarketSnapshot>> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let markets: Vec<MarketSnapshot> =
            self.script.lock().markets.iter().take(n).cloned().collect();
        if markets.is_empty() {
            return Err(GatewayError::Empty { requested: n }.into());
        }
        Ok(markets)
    }

    async fn fetch_snapshot(&self, ids: &[AssetId]) -> Result<Vec<MarketSnapshot>> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(ids.to_vec());
        if self.fail_snapshots.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                endpoint: "/coins/markets".into(),
                status: 429,
            }
            .into());
        }

        let found: Vec<MarketSnapshot> = self
            .script
            .lock()
            .markets
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(GatewayError::Empty {
                requested: ids.len(),
            }
            .into());
        }
        Ok(found)
    }

    async fn resolve_asset(&self, query: &str) -> Result<Option<AssetRef>> {
        let needle = query.trim().to_lowercase();
        let script = self.script.lock();
        Ok(script
            .directory
            .iter()
            .find(|r| {
                r.id.as_str() == needle
                    || r.symbol.to_lowercase() == needle
                    || r.name.to_lowercase() == needle
            })
            .cloned())
    }
}
