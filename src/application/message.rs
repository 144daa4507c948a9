//! HTML message rendering for alerts and chat replies.
//!
//! Telegram's HTML mode is used with bold tags only; every value that
//! comes from the provider is escaped.

use std::fmt::Write as _;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::spike::WindowMove;
use crate::domain::time::minutes_between;
use crate::domain::MarketSnapshot;

/// Banner sent once per cycle before the first alert.
pub const PRICE_CHANGE_HEADER: &str = "📊 <b>PRICE CHANGE</b>";

/// Escape text for Telegram's HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Price without trailing zeros.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    price.normalize().to_string()
}

/// Signed percentage with two decimals, e.g. `+6.00%`.
#[must_use]
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:+.2}%")
}

fn format_optional_percent(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_percent)
}

fn title(snapshot: &MarketSnapshot) -> String {
    format!(
        "<b>{}</b> ({})",
        escape_html(&snapshot.name),
        escape_html(&snapshot.symbol.to_uppercase())
    )
}

/// Detail message for one spiking asset.
#[must_use]
pub fn spike_alert(snapshot: &MarketSnapshot, window_move: &WindowMove<'_>, now: i64) -> String {
    let minutes = minutes_between(window_move.reference.timestamp, now);
    format!(
        "🚨 {}\n\
        📉 Old price: ${}\n\
        📈 Current price: ${}\n\
        ⏱ Change: {} over {} min\n\
        ⏳ 1h: {}\n\
        📆 24h: {}",
        title(snapshot),
        format_price(window_move.reference.price),
        format_price(snapshot.price),
        format_percent(window_move.change_percent),
        minutes,
        format_optional_percent(snapshot.change_1h),
        format_optional_percent(snapshot.change_24h),
    )
}

/// Metrics card for a single asset.
#[must_use]
pub fn asset_card(snapshot: &MarketSnapshot) -> String {
    format!(
        "💰 {}\n\
        Price: ${}\n\
        ⏱ 1h: {}\n\
        📆 24h: {}",
        title(snapshot),
        format_price(snapshot.price),
        format_optional_percent(snapshot.change_1h),
        format_optional_percent(snapshot.change_24h),
    )
}

/// Ranked list of assets.
#[must_use]
pub fn top_list(snapshots: &[MarketSnapshot]) -> String {
    let mut msg = format!("💎 <b>Top {} coins</b>\n", snapshots.len());
    for (i, snapshot) in snapshots.iter().enumerate() {
        let _ = write!(
            msg,
            "\n{}. {}\n💰 Price: ${}\n⏱ 1h: {}\n📆 24h: {}\n",
            i + 1,
            title(snapshot),
            format_price(snapshot.price),
            format_optional_percent(snapshot.change_1h),
            format_optional_percent(snapshot.change_24h),
        );
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::MINUTE_MS;
    use crate::domain::{AssetId, PriceSample};
    use rust_decimal_macros::dec;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            id: AssetId::new("bitcoin"),
            symbol: "btc".into(),
            name: "Bit<coin>".into(),
            price: dec!(106.00),
            change_1h: Some(dec!(1.234)),
            change_24h: None,
        }
    }

    #[test]
    fn escapes_html_specials() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn percent_is_signed_and_rounded() {
        assert_eq!(format_percent(dec!(6)), "+6.00%");
        assert_eq!(format_percent(dec!(-2.345)), "-2.35%");
        assert_eq!(format_percent(dec!(0.004)), "+0.00%");
    }

    #[test]
    fn price_drops_trailing_zeros() {
        assert_eq!(format_price(dec!(106.00)), "106");
        assert_eq!(format_price(dec!(0.000065)), "0.000065");
    }

    #[test]
    fn spike_alert_mentions_both_prices_and_window() {
        let now = 1_700_000_000_000;
        let reference = PriceSample {
            asset_id: AssetId::new("bitcoin"),
            price: dec!(100),
            change_1h: None,
            change_24h: None,
            timestamp: now - 4 * MINUTE_MS,
        };
        let window_move = WindowMove {
            change_percent: dec!(6),
            reference: &reference,
        };

        let text = spike_alert(&snapshot(), &window_move, now);

        assert!(text.starts_with("🚨 <b>Bit&lt;coin&gt;</b> (BTC)"));
        assert!(text.contains("Old price: $100"));
        assert!(text.contains("Current price: $106"));
        assert!(text.contains("Change: +6.00% over 4 min"));
        assert!(text.contains("1h: +1.23%"));
        assert!(text.contains("24h: n/a"));
    }

    #[test]
    fn top_list_numbers_entries() {
        let text = top_list(&[snapshot(), snapshot()]);

        assert!(text.starts_with("💎 <b>Top 2 coins</b>"));
        assert!(text.contains("\n1. <b>"));
        assert!(text.contains("\n2. <b>"));
    }
}
