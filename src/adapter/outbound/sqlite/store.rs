//! SQLite price history store.
//!
//! One table holds every asset's samples keyed by `(asset_id, ts)`; all
//! queries are parameterized. Asset ids are still reduced to their
//! storage key so a logical asset always lands on the same rows.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    NewPriceSampleRow, NewSentAlertRow, PriceSampleRow, SubscriptionRow, TrackedAssetRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    price_samples, sent_alerts, subscriptions, tracked_assets,
};
use crate::domain::time::now_ms;
use crate::domain::{AssetId, PriceSample, SentAlert, Subscription, UserId};
use crate::error::{Result, StorageError};
use crate::port::outbound::store::{AlertLog, PriceHistory, SubscriptionStore};

type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed store for samples, subscriptions and the alert log.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteHistoryStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<SqlitePooledConnection> {
        self.pool
            .get()
            .map_err(|e| StorageError::Pool(e.to_string()).into())
    }

    fn to_row(sample: &PriceSample) -> NewPriceSampleRow {
        NewPriceSampleRow {
            asset_id: sample.asset_id.storage_key(),
            price: sample.price.to_string(),
            change_1h: sample.change_1h.map(|c| c.to_string()),
            change_24h: sample.change_24h.map(|c| c.to_string()),
            ts: sample.timestamp,
        }
    }

    fn from_row(asset: &AssetId, row: PriceSampleRow) -> Result<PriceSample> {
        Ok(PriceSample {
            asset_id: asset.clone(),
            price: parse_decimal(&row.price)?,
            change_1h: row.change_1h.as_deref().map(parse_decimal).transpose()?,
            change_24h: row.change_24h.as_deref().map(parse_decimal).transpose()?,
            timestamp: row.ts,
        })
    }

    /// Storage keys of every tracked asset, sorted.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_tracked_assets(&self) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        let keys = tracked_assets::table
            .select(tracked_assets::asset_id)
            .order(tracked_assets::asset_id.asc())
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(keys)
    }

    /// Wipe samples, tracked assets and the alert log. Subscriptions survive.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    /// Returns an error if any delete fails; the wipe is all-or-nothing.
    pub fn reset_history(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        let deleted = conn.immediate_transaction::<_, StorageError, _>(|conn| {
            let samples = diesel::delete(price_samples::table).execute(conn)?;
            let tracked = diesel::delete(tracked_assets::table).execute(conn)?;
            let alerts = diesel::delete(sent_alerts::table).execute(conn)?;
            Ok(samples + tracked + alerts)
        })?;
        Ok(deleted)
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        StorageError::CorruptRow {
            table: "price_samples",
            reason: format!("`{raw}` is not a decimal: {e}"),
        }
        .into()
    })
}

impl PriceHistory for SqliteHistoryStore {
    async fn ensure_asset_tracked(&self, asset: &AssetId) -> Result<()> {
        let row = TrackedAssetRow {
            asset_id: asset.storage_key(),
            created_at: now_ms(),
        };
        let mut conn = self.conn()?;

        diesel::insert_or_ignore_into(tracked_assets::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn append_sample(&self, sample: &PriceSample) -> Result<()> {
        let row = Self::to_row(sample);
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, StorageError, _>(|conn| {
            let tracked: i64 = tracked_assets::table
                .filter(tracked_assets::asset_id.eq(&row.asset_id))
                .count()
                .get_result(conn)?;
            if tracked == 0 {
                return Err(StorageError::UntrackedAsset {
                    asset: sample.asset_id.to_string(),
                });
            }

            diesel::insert_into(price_samples::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }

    async fn recent_samples(
        &self,
        asset: &AssetId,
        since: i64,
        limit: usize,
    ) -> Result<Vec<PriceSample>> {
        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<PriceSampleRow> = price_samples::table
            .filter(price_samples::asset_id.eq(asset.storage_key()))
            .filter(price_samples::ts.ge(since))
            .order((price_samples::ts.desc(), price_samples::id.desc()))
            .limit(limit)
            .select(PriceSampleRow::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| Self::from_row(asset, row))
            .collect()
    }

    async fn purge_samples_older_than(&self, cutoff: i64) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(price_samples::table.filter(price_samples::ts.lt(cutoff)))
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        Ok(deleted)
    }
}

impl SubscriptionStore for SqliteHistoryStore {
    async fn add_subscription(&self, subscription: &Subscription) -> Result<()> {
        let row = SubscriptionRow {
            user_id: subscription.user_id.0,
            asset_id: subscription.asset_id.to_string(),
        };
        let mut conn = self.conn()?;

        diesel::insert_or_ignore_into(subscriptions::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn list_subscriptions(&self, user: UserId) -> Result<Vec<AssetId>> {
        let mut conn = self.conn()?;

        let ids: Vec<String> = subscriptions::table
            .filter(subscriptions::user_id.eq(user.0))
            .select(subscriptions::asset_id)
            .order(subscriptions::asset_id.asc())
            .load(&mut conn)
            .map_err(StorageError::from)?;

        Ok(ids.into_iter().map(AssetId::from).collect())
    }

    async fn list_all_subscribed_assets(&self) -> Result<Vec<AssetId>> {
        let mut conn = self.conn()?;

        let ids: Vec<String> = subscriptions::table
            .select(subscriptions::asset_id)
            .distinct()
            .order(subscriptions::asset_id.asc())
            .load(&mut conn)
            .map_err(StorageError::from)?;

        Ok(ids.into_iter().map(AssetId::from).collect())
    }
}

impl AlertLog for SqliteHistoryStore {
    async fn record_alert(&self, alert: &SentAlert) -> Result<()> {
        let row = NewSentAlertRow {
            asset_id: alert.asset_id.storage_key(),
            message: alert.message.clone(),
            ts: alert.timestamp,
        };
        let mut conn = self.conn()?;

        diesel::insert_into(sent_alerts::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn count_alerts_between(
        &self,
        asset: &AssetId,
        since: i64,
        until: i64,
    ) -> Result<usize> {
        let mut conn = self.conn()?;

        let count: i64 = sent_alerts::table
            .filter(sent_alerts::asset_id.eq(asset.storage_key()))
            .filter(sent_alerts::ts.between(since, until))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn purge_alerts_older_than(&self, cutoff: i64) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(sent_alerts::table.filter(sent_alerts::ts.lt(cutoff)))
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        Ok(deleted)
    }
}
