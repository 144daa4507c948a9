//! Millisecond time helpers.
//!
//! All persisted timestamps are milliseconds since the Unix epoch.

use chrono::Utc;

pub const MINUTE_MS: i64 = 60_000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Current wall-clock time in milliseconds since the epoch.
#[must_use]
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Whole minutes between two timestamps, rounded to nearest.
#[must_use]
pub fn minutes_between(earlier: i64, later: i64) -> i64 {
    let gap = later - earlier;
    (gap + MINUTE_MS / 2).div_euclid(MINUTE_MS)
}
