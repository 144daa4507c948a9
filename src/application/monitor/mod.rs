//! Price-change monitoring cycle.
//!
//! One cycle:
//! 1. Collect the universe: top-N assets plus every subscribed asset.
//! 2. Fetch one batched snapshot for the whole universe.
//! 3. Per asset, in gateway order: read the recent window, append the
//!    current sample, run the spike detector, gate through the rate
//!    limiter, and dispatch alerts (header first, once per cycle).
//! 4. Sweep alerts and samples past their retention.
//!
//! A failure ends the cycle early. Work already done for earlier assets
//! stays; the next scheduled cycle starts from scratch.

mod scheduler;

pub use scheduler::{MonitorHandle, MonitorScheduler};

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::limiter::AlertRateLimiter;
use super::message;
use crate::domain::spike;
use crate::domain::time::{now_ms, HOUR_MS, MINUTE_MS};
use crate::domain::{AssetId, MarketSnapshot, SentAlert};
use crate::error::Error;
use crate::port::outbound::market::MarketDataGateway;
use crate::port::outbound::notifier::AlertNotifier;
use crate::port::outbound::store::{AlertLog, PriceHistory, SubscriptionStore};

/// Tunables for a monitoring cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// Spike threshold in percent. Always positive.
    pub threshold_percent: Decimal,
    /// How many top-ranked assets are always monitored.
    pub top_n: usize,
    /// Lookback of the detection window.
    pub window_ms: i64,
    /// Maximum samples in the detection window.
    pub window_limit: usize,
    /// Alerts allowed per asset per rolling hour.
    pub alert_limit_per_hour: usize,
    pub alert_retention_ms: i64,
    pub sample_retention_ms: i64,
}

impl MonitorSettings {
    /// Defaults for everything except the threshold, which has none.
    #[must_use]
    pub fn with_threshold(threshold_percent: Decimal) -> Self {
        Self {
            threshold_percent,
            top_n: 30,
            window_ms: 5 * MINUTE_MS,
            window_limit: 5,
            alert_limit_per_hour: 3,
            alert_retention_ms: 24 * HOUR_MS,
            sample_retention_ms: 24 * HOUR_MS,
        }
    }
}

/// Phase of the cycle a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    CollectUniverse,
    BatchFetch,
    Evaluate,
    Dispatch,
    Retention,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollectUniverse => "collect_universe",
            Self::BatchFetch => "batch_fetch",
            Self::Evaluate => "evaluate",
            Self::Dispatch => "dispatch",
            Self::Retention => "retention",
        };
        f.write_str(name)
    }
}

/// Counters for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub assets_evaluated: usize,
    pub samples_written: usize,
    pub spikes_detected: usize,
    pub alerts_sent: usize,
    pub alerts_suppressed: usize,
    pub alerts_purged: usize,
    pub samples_purged: usize,
}

/// Why a cycle ended early.
#[derive(Debug)]
pub struct CycleFailure {
    pub phase: CyclePhase,
    pub asset: Option<AssetId>,
    pub error: Error,
}

impl fmt::Display for CycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.asset {
            Some(asset) => write!(f, "{} failed for {}: {}", self.phase, asset, self.error),
            None => write!(f, "{} failed: {}", self.phase, self.error),
        }
    }
}

/// Result of asking the monitor to run a cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// Ended early; `report` covers the work done before the failure.
    Failed {
        failure: CycleFailure,
        report: CycleReport,
    },
    /// Another cycle was still in flight.
    Skipped,
}

impl CycleOutcome {
    #[must_use]
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Completed(report) | Self::Failed { report, .. } => Some(report),
            Self::Skipped => None,
        }
    }
}

/// Per-cycle mutable state, threaded through evaluation.
#[derive(Debug, Default)]
struct CycleState {
    header_sent: bool,
    report: CycleReport,
}

/// Clears the in-flight flag when dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates monitoring cycles against the store, gateway and notifier.
pub struct Monitor<S> {
    store: S,
    gateway: Arc<dyn MarketDataGateway>,
    notifier: Arc<dyn AlertNotifier>,
    limiter: AlertRateLimiter,
    settings: MonitorSettings,
    in_flight: AtomicBool,
}

impl<S> Monitor<S>
where
    S: PriceHistory + SubscriptionStore + AlertLog,
{
    pub fn new(
        store: S,
        gateway: Arc<dyn MarketDataGateway>,
        notifier: Arc<dyn AlertNotifier>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            notifier,
            limiter: AlertRateLimiter::per_hour(settings.alert_limit_per_hour),
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run one cycle stamped with the current wall-clock time.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.run_cycle_at(now_ms()).await
    }

    /// Run one cycle stamped with `now` (milliseconds since the epoch).
    ///
    /// Never panics or propagates: failures are logged and returned as
    /// [`CycleOutcome::Failed`]. Returns [`CycleOutcome::Skipped`] when a
    /// cycle is already running.
    pub async fn run_cycle_at(&self, now: i64) -> CycleOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Previous monitoring cycle still running, skipping tick");
            return CycleOutcome::Skipped;
        };

        info!("Checking prices");
        let mut state = CycleState::default();

        match self.execute(now, &mut state).await {
            Ok(()) => {
                let report = state.report;
                info!(
                    assets = report.assets_evaluated,
                    spikes = report.spikes_detected,
                    alerts_sent = report.alerts_sent,
                    alerts_suppressed = report.alerts_suppressed,
                    alerts_purged = report.alerts_purged,
                    samples_purged = report.samples_purged,
                    "Monitoring cycle complete"
                );
                CycleOutcome::Completed(report)
            }
            Err(failure) => {
                error!(
                    phase = %failure.phase,
                    asset = failure.asset.as_ref().map(AssetId::as_str),
                    error = %failure.error,
                    "Monitoring cycle failed"
                );
                CycleOutcome::Failed {
                    failure,
                    report: state.report,
                }
            }
        }
    }

    async fn execute(&self, now: i64, state: &mut CycleState) -> Result<(), CycleFailure> {
        let universe = self.collect_universe().await?;
        debug!(assets = universe.len(), "Collected monitoring universe");

        let snapshots = self
            .gateway
            .fetch_snapshot(&universe)
            .await
            .map_err(|error| fail(CyclePhase::BatchFetch, None, error))?;

        for snapshot in &snapshots {
            self.evaluate(snapshot, now, state).await?;
        }

        self.sweep(now, state).await
    }

    /// Top-N ids followed by subscribed ids, de-duplicated, order kept.
    async fn collect_universe(&self) -> Result<Vec<AssetId>, CycleFailure> {
        let top = self
            .gateway
            .fetch_top_assets(self.settings.top_n)
            .await
            .map_err(|error| fail(CyclePhase::CollectUniverse, None, error))?;
        let subscribed = self
            .store
            .list_all_subscribed_assets()
            .await
            .map_err(|error| fail(CyclePhase::CollectUniverse, None, error))?;

        let mut seen = HashSet::new();
        Ok(top
            .into_iter()
            .map(|snapshot| snapshot.id)
            .chain(subscribed)
            .filter(|id| seen.insert(id.clone()))
            .collect())
    }

    async fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        now: i64,
        state: &mut CycleState,
    ) -> Result<(), CycleFailure> {
        let asset = &snapshot.id;
        let storage = |error| fail(CyclePhase::Evaluate, Some(asset), error);

        self.store.ensure_asset_tracked(asset).await.map_err(storage)?;

        // The window is the past; the snapshot just fetched is "now".
        let window = self
            .store
            .recent_samples(
                asset,
                now - self.settings.window_ms,
                self.settings.window_limit,
            )
            .await
            .map_err(storage)?;

        self.store
            .append_sample(&snapshot.to_sample(now))
            .await
            .map_err(storage)?;
        state.report.assets_evaluated += 1;
        state.report.samples_written += 1;

        let Some(assessment) = spike::assess(
            snapshot.price,
            snapshot.change_1h,
            &window,
            self.settings.threshold_percent,
        ) else {
            debug!(asset = %asset, "No recent history yet");
            return Ok(());
        };

        if !assessment.spiking {
            return Ok(());
        }
        state.report.spikes_detected += 1;

        let allowed = self
            .limiter
            .can_alert(&self.store, asset, now)
            .await
            .map_err(storage)?;
        if !allowed {
            warn!(
                asset = %asset,
                limit = self.limiter.max_alerts(),
                change = %assessment.window_move.change_percent,
                "Alert limit reached, skipping"
            );
            state.report.alerts_suppressed += 1;
            return Ok(());
        }

        let dispatch = |error| fail(CyclePhase::Dispatch, Some(asset), error);
        if !state.header_sent {
            self.notifier
                .send(message::PRICE_CHANGE_HEADER)
                .await
                .map_err(dispatch)?;
            state.header_sent = true;
        }

        let text = message::spike_alert(snapshot, &assessment.window_move, now);
        self.notifier.send(&text).await.map_err(dispatch)?;

        self.store
            .record_alert(&SentAlert {
                asset_id: asset.clone(),
                message: text,
                timestamp: now,
            })
            .await
            .map_err(storage)?;
        state.report.alerts_sent += 1;

        info!(
            asset = %asset,
            change = %assessment.window_move.change_percent,
            "Price alert dispatched"
        );
        Ok(())
    }

    async fn sweep(&self, now: i64, state: &mut CycleState) -> Result<(), CycleFailure> {
        let retention = |error| fail(CyclePhase::Retention, None, error);

        state.report.alerts_purged = self
            .store
            .purge_alerts_older_than(now - self.settings.alert_retention_ms)
            .await
            .map_err(retention)?;
        state.report.samples_purged = self
            .store
            .purge_samples_older_than(now - self.settings.sample_retention_ms)
            .await
            .map_err(retention)?;
        Ok(())
    }
}

fn fail(phase: CyclePhase, asset: Option<&AssetId>, error: Error) -> CycleFailure {
    CycleFailure {
        phase,
        asset: asset.cloned(),
        error,
    }
}

#[cfg(test)]
mod tests;
