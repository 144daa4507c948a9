//! Handler for the `history` command.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::HistoryArgs;
use crate::adapter::inbound::cli::output;
use crate::application::message::{format_percent, format_price};
use crate::domain::{AssetId, PriceSample};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::PriceHistory;

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "1h")]
    change_1h: String,
    #[tabled(rename = "24h")]
    change_24h: String,
}

impl From<&PriceSample> for SampleRow {
    fn from(sample: &PriceSample) -> Self {
        let time = DateTime::<Utc>::from_timestamp_millis(sample.timestamp).map_or_else(
            || sample.timestamp.to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        let percent =
            |value: Option<Decimal>| value.map_or_else(|| "n/a".to_string(), format_percent);
        Self {
            time,
            price: format_price(sample.price),
            change_1h: percent(sample.change_1h),
            change_24h: percent(sample.change_24h),
        }
    }
}

/// Print the newest samples of one asset.
///
/// # Errors
/// Returns an error if the database cannot be read.
pub async fn execute(config: &Config, args: &HistoryArgs) -> Result<()> {
    let store = bootstrap::open_store(config)?;
    let asset = AssetId::new(&args.asset);
    let samples = store.recent_samples(&asset, i64::MIN, args.limit).await?;

    if samples.is_empty() {
        output::warning(&format!("No samples stored for `{asset}`"));
        let tracked = store.list_tracked_assets()?;
        if !tracked.is_empty() {
            output::field("Tracked", tracked.join(", "));
        }
        return Ok(());
    }

    let rows: Vec<SampleRow> = samples.iter().map(SampleRow::from).collect();
    let json_rows: Vec<_> = samples
        .iter()
        .map(|s| {
            json!({
                "ts": s.timestamp,
                "price": s.price.to_string(),
                "change_1h": s.change_1h.map(|c| c.to_string()),
                "change_24h": s.change_24h.map(|c| c.to_string()),
            })
        })
        .collect();

    output::section(&format!("{asset} ({} samples, newest first)", samples.len()));
    output::block(
        &Table::new(rows).to_string(),
        json!({ "asset": asset.as_str(), "samples": json_rows }),
    );
    Ok(())
}
