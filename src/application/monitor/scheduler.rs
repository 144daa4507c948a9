//! Fixed-interval scheduling of monitoring cycles.
//!
//! The first cycle runs immediately. Each tick awaits its cycle before the
//! next tick is taken, and ticks missed while a slow cycle was running are
//! skipped rather than queued, so cycles never pile up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::{CycleOutcome, Monitor};
use crate::port::outbound::store::{AlertLog, PriceHistory, SubscriptionStore};

/// Handle to a running scheduler.
pub struct MonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<usize>,
}

impl MonitorHandle {
    /// Stop after the in-flight cycle (if any) finishes.
    ///
    /// Returns the number of cycles that were started.
    pub async fn shutdown(self) -> usize {
        let _ = self.shutdown_tx.send(()).await;
        self.task.await.unwrap_or(0)
    }
}

/// Drives a [`Monitor`] on a fixed interval.
pub struct MonitorScheduler<S> {
    monitor: Arc<Monitor<S>>,
    interval: Duration,
}

impl<S> MonitorScheduler<S>
where
    S: PriceHistory + SubscriptionStore + AlertLog + 'static,
{
    pub fn new(monitor: Arc<Monitor<S>>, interval: Duration) -> Self {
        Self { monitor, interval }
    }

    /// Spawn the scheduling loop.
    pub fn start(self) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let monitor = self.monitor;
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut cycles = 0usize;

            info!(interval_secs = interval.as_secs(), "Price monitor started");

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!(cycles, "Price monitor shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        cycles += 1;
                        if let CycleOutcome::Skipped = monitor.run_cycle().await {
                            debug!("Tick skipped, cycle already in flight");
                        }
                    }
                }
            }

            cycles
        });

        MonitorHandle { shutdown_tx, task }
    }
}
