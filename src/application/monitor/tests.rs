use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use super::*;
use crate::adapter::outbound::sqlite::SqliteHistoryStore;
use crate::domain::{PriceSample, Subscription, UserId};
use crate::testkit::domain::{sample, snapshot, snapshot_with_change};
use crate::testkit::gateway::ScriptedGateway;
use crate::testkit::notifier::RecordingNotifier;
use crate::testkit::store::memory_store;

const T0: i64 = 1_700_000_000_000;

struct Fixture {
    store: SqliteHistoryStore,
    gateway: ScriptedGateway,
    notifier: RecordingNotifier,
    monitor: Monitor<SqliteHistoryStore>,
}

fn fixture(markets: Vec<MarketSnapshot>) -> Fixture {
    fixture_with(markets, MonitorSettings::with_threshold(dec!(5)))
}

fn fixture_with(markets: Vec<MarketSnapshot>, settings: MonitorSettings) -> Fixture {
    let store = memory_store();
    let gateway = ScriptedGateway::new(markets);
    let notifier = RecordingNotifier::new();
    let monitor = Monitor::new(
        store.clone(),
        Arc::new(gateway.clone()),
        Arc::new(notifier.clone()),
        settings,
    );
    Fixture {
        store,
        gateway,
        notifier,
        monitor,
    }
}

async fn seed(store: &SqliteHistoryStore, sample: PriceSample) {
    store.ensure_asset_tracked(&sample.asset_id).await.unwrap();
    store.append_sample(&sample).await.unwrap();
}

fn completed(outcome: CycleOutcome) -> CycleReport {
    match outcome {
        CycleOutcome::Completed(report) => report,
        other => panic!("expected completed cycle, got {other:?}"),
    }
}

#[tokio::test]
async fn first_cycle_only_records_history() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);

    let report = completed(fx.monitor.run_cycle_at(T0).await);

    assert_eq!(report.assets_evaluated, 1);
    assert_eq!(report.samples_written, 1);
    assert_eq!(report.spikes_detected, 0);
    assert!(fx.notifier.is_empty());
}

#[tokio::test]
async fn spike_sends_header_then_detail() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    completed(fx.monitor.run_cycle_at(T0).await);

    fx.gateway.set_price("bitcoin", dec!(106));
    let report = completed(fx.monitor.run_cycle_at(T0 + MINUTE_MS).await);

    assert_eq!(report.spikes_detected, 1);
    assert_eq!(report.alerts_sent, 1);
    let messages = fx.notifier.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], message::PRICE_CHANGE_HEADER);
    assert!(messages[1].contains("Change: +6.00% over 1 min"));

    let sent = fx
        .store
        .count_alerts_between(&AssetId::new("bitcoin"), T0, i64::MAX)
        .await
        .unwrap();
    assert_eq!(sent, 1);
}

#[tokio::test]
async fn small_move_stays_quiet() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    completed(fx.monitor.run_cycle_at(T0).await);

    fx.gateway.set_price("bitcoin", dec!(102));
    let report = completed(fx.monitor.run_cycle_at(T0 + MINUTE_MS).await);

    assert_eq!(report.spikes_detected, 0);
    assert!(fx.notifier.is_empty());
}

#[tokio::test]
async fn header_is_sent_once_per_cycle() {
    let fx = fixture(vec![
        snapshot("bitcoin", dec!(100)),
        snapshot("ethereum", dec!(10)),
    ]);
    completed(fx.monitor.run_cycle_at(T0).await);

    fx.gateway.set_price("bitcoin", dec!(90));
    fx.gateway.set_price("ethereum", dec!(12));
    let report = completed(fx.monitor.run_cycle_at(T0 + MINUTE_MS).await);

    assert_eq!(report.alerts_sent, 2);
    let messages = fx.notifier.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.as_str() == message::PRICE_CHANGE_HEADER)
            .count(),
        1
    );

    // A new cycle gets its own header.
    fx.gateway.set_price("bitcoin", dec!(70));
    completed(fx.monitor.run_cycle_at(T0 + 2 * MINUTE_MS).await);
    let messages = fx.notifier.messages();
    assert_eq!(messages[3], message::PRICE_CHANGE_HEADER);
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.as_str() == message::PRICE_CHANGE_HEADER)
            .count(),
        2
    );
}

#[tokio::test]
async fn provider_hourly_change_alone_triggers_alert() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    completed(fx.monitor.run_cycle_at(T0).await);

    fx.gateway
        .set_market(snapshot_with_change("bitcoin", dec!(100), dec!(-7.5)));
    let report = completed(fx.monitor.run_cycle_at(T0 + MINUTE_MS).await);

    assert_eq!(report.alerts_sent, 1);
    assert!(fx.notifier.messages()[1].contains("1h: -7.50%"));
}

#[tokio::test]
async fn rate_limited_asset_is_suppressed_but_sampled() {
    let fx = fixture(vec![snapshot("x", dec!(110))]);
    let asset = AssetId::new("x");
    seed(&fx.store, sample("x", dec!(100), T0 - MINUTE_MS)).await;
    for minutes_ago in [10, 20, 30] {
        fx.store
            .record_alert(&SentAlert {
                asset_id: asset.clone(),
                message: "earlier".into(),
                timestamp: T0 - minutes_ago * MINUTE_MS,
            })
            .await
            .unwrap();
    }

    let report = completed(fx.monitor.run_cycle_at(T0).await);

    assert_eq!(report.spikes_detected, 1);
    assert_eq!(report.alerts_suppressed, 1);
    assert_eq!(report.alerts_sent, 0);
    assert!(fx.notifier.is_empty());

    let window = fx.store.recent_samples(&asset, T0, 5).await.unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].price, dec!(110));
    assert_eq!(window[0].timestamp, T0);
}

#[tokio::test]
async fn fourth_spike_in_an_hour_is_dropped() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    completed(fx.monitor.run_cycle_at(T0).await);

    let mut price = dec!(100);
    for minute in 1..=4 {
        price *= dec!(1.1);
        fx.gateway.set_price("bitcoin", price);
        completed(fx.monitor.run_cycle_at(T0 + minute * MINUTE_MS).await);
    }

    let sent = fx
        .store
        .count_alerts_between(&AssetId::new("bitcoin"), T0, i64::MAX)
        .await
        .unwrap();
    assert_eq!(sent, 3);
}

#[tokio::test]
async fn universe_is_top_assets_then_subscriptions_deduplicated() {
    let mut settings = MonitorSettings::with_threshold(dec!(5));
    settings.top_n = 2;
    let fx = fixture_with(
        vec![
            snapshot("bitcoin", dec!(100)),
            snapshot("ethereum", dec!(10)),
            snapshot("solana", dec!(5)),
            snapshot("dogecoin", dec!(0.1)),
        ],
        settings,
    );
    for asset in ["ethereum", "dogecoin"] {
        fx.store
            .add_subscription(&Subscription {
                user_id: UserId(7),
                asset_id: AssetId::new(asset),
            })
            .await
            .unwrap();
    }

    let report = completed(fx.monitor.run_cycle_at(T0).await);

    assert_eq!(
        fx.gateway.requested_batches(),
        vec![vec![
            AssetId::new("bitcoin"),
            AssetId::new("ethereum"),
            AssetId::new("dogecoin"),
        ]]
    );
    assert_eq!(report.assets_evaluated, 3);
    assert_eq!(fx.gateway.snapshot_calls(), 1);
}

#[tokio::test]
async fn gateway_failure_aborts_cycle_before_any_write() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    fx.gateway.fail_snapshots(true);

    let outcome = fx.monitor.run_cycle_at(T0).await;

    let CycleOutcome::Failed { failure, report } = outcome else {
        panic!("expected failed cycle");
    };
    assert_eq!(failure.phase, CyclePhase::BatchFetch);
    assert_eq!(report, CycleReport::default());
    assert!(fx.store.list_tracked_assets().unwrap().is_empty());

    // The next cycle starts fresh.
    fx.gateway.fail_snapshots(false);
    completed(fx.monitor.run_cycle_at(T0 + MINUTE_MS).await);
}

#[tokio::test]
async fn notifier_failure_ends_cycle_without_recording_alert() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    completed(fx.monitor.run_cycle_at(T0).await);

    fx.gateway.set_price("bitcoin", dec!(120));
    fx.notifier.set_failing(true);
    let outcome = fx.monitor.run_cycle_at(T0 + MINUTE_MS).await;

    let CycleOutcome::Failed { failure, report } = outcome else {
        panic!("expected failed cycle");
    };
    assert_eq!(failure.phase, CyclePhase::Dispatch);
    assert_eq!(failure.asset, Some(AssetId::new("bitcoin")));
    assert_eq!(report.samples_written, 1);
    assert_eq!(report.alerts_sent, 0);

    let sent = fx
        .store
        .count_alerts_between(&AssetId::new("bitcoin"), T0, i64::MAX)
        .await
        .unwrap();
    assert_eq!(sent, 0);
}

#[tokio::test]
async fn retention_sweeps_old_alerts_and_samples() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    let asset = AssetId::new("bitcoin");
    let stale = T0 - 25 * HOUR_MS;
    seed(&fx.store, sample("bitcoin", dec!(90), stale)).await;
    fx.store
        .record_alert(&SentAlert {
            asset_id: asset.clone(),
            message: "old".into(),
            timestamp: stale,
        })
        .await
        .unwrap();

    let report = completed(fx.monitor.run_cycle_at(T0).await);

    assert_eq!(report.alerts_purged, 1);
    assert_eq!(report.samples_purged, 1);
    assert_eq!(fx.store.count_alerts_between(&asset, 0, i64::MAX).await.unwrap(), 0);
    let remaining = fx.store.recent_samples(&asset, 0, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].timestamp, T0);
}

#[tokio::test]
async fn overlapping_cycle_is_skipped() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    fx.gateway.set_delay(Duration::from_millis(200));
    let monitor = Arc::new(fx.monitor);

    let first = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move { monitor.run_cycle_at(T0).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = monitor.run_cycle_at(T0 + 1).await;
    assert!(matches!(second, CycleOutcome::Skipped));
    assert!(second.report().is_none());

    let first = first.await.unwrap();
    assert!(matches!(first, CycleOutcome::Completed(_)));
    assert_eq!(fx.gateway.snapshot_calls(), 1);

    // The guard is released once the cycle ends.
    completed(monitor.run_cycle_at(T0 + MINUTE_MS).await);
}

#[tokio::test]
async fn scheduler_runs_until_shutdown() {
    let fx = fixture(vec![snapshot("bitcoin", dec!(100))]);
    let monitor = Arc::new(fx.monitor);

    let handle = MonitorScheduler::new(monitor, Duration::from_millis(40)).start();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let cycles = handle.shutdown().await;

    assert!(cycles >= 2, "ran {cycles} cycles");
    assert_eq!(fx.gateway.snapshot_calls(), cycles);
}
