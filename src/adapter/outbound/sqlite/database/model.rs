//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{price_samples, sent_alerts, subscriptions, tracked_assets};

/// Database row marking an asset as tracked.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = tracked_assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackedAssetRow {
    pub asset_id: String,
    pub created_at: i64,
}

/// Database row for a price sample (insertable).
///
/// Decimals are stored as canonical text so they read back unchanged.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = price_samples)]
pub struct NewPriceSampleRow {
    pub asset_id: String,
    pub price: String,
    pub change_1h: Option<String>,
    pub change_24h: Option<String>,
    pub ts: i64,
}

/// Database row for a price sample (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = price_samples)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceSampleRow {
    pub id: i32,
    pub asset_id: String,
    pub price: String,
    pub change_1h: Option<String>,
    pub change_24h: Option<String>,
    pub ts: i64,
}

/// Database row for a subscription.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionRow {
    pub user_id: i64,
    pub asset_id: String,
}

/// Database row for a sent alert (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sent_alerts)]
pub struct NewSentAlertRow {
    pub asset_id: String,
    pub message: String,
    pub ts: i64,
}
