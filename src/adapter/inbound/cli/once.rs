//! Handler for the `once` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::OnceArgs;
use crate::adapter::inbound::cli::output;
use crate::application::monitor::{CycleOutcome, CycleReport};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Run one monitoring cycle and print its report.
///
/// # Errors
/// Returns an error if setup fails or the cycle ends early.
pub async fn execute(config: &Config, args: &OnceArgs) -> Result<()> {
    config.monitor.threshold()?;
    let store = bootstrap::open_store(config)?;
    let gateway = bootstrap::build_gateway(config);
    let notifier = bootstrap::build_notifier(config, args.dry_run)?;
    let monitor = bootstrap::build_monitor(config, store, gateway, notifier)?;

    match monitor.run_cycle().await {
        CycleOutcome::Completed(report) => {
            print_report(&report);
            output::success("Cycle complete");
            Ok(())
        }
        CycleOutcome::Failed { failure, report } => {
            print_report(&report);
            output::error(&failure.to_string());
            Err(failure.error)
        }
        CycleOutcome::Skipped => Err(Error::Io(std::io::Error::other(
            "another cycle is already running",
        ))),
    }
}

fn print_report(report: &CycleReport) {
    if output::is_json() {
        output::block(
            "",
            json!({
                "assets_evaluated": report.assets_evaluated,
                "samples_written": report.samples_written,
                "spikes_detected": report.spikes_detected,
                "alerts_sent": report.alerts_sent,
                "alerts_suppressed": report.alerts_suppressed,
                "alerts_purged": report.alerts_purged,
                "samples_purged": report.samples_purged,
            }),
        );
        return;
    }
    output::section("Cycle report");
    output::field("Assets evaluated", report.assets_evaluated);
    output::field("Samples written", report.samples_written);
    output::field("Spikes detected", report.spikes_detected);
    output::field("Alerts sent", report.alerts_sent);
    output::field("Alerts suppressed", report.alerts_suppressed);
    output::field("Alerts purged", report.alerts_purged);
    output::field("Samples purged", report.samples_purged);
}
