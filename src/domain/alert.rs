//! Alert log entries and subscriptions.

use serde::{Deserialize, Serialize};

use super::id::{AssetId, UserId};

/// A notification that was dispatched for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentAlert {
    pub asset_id: AssetId,
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// A user's interest in an asset. Unique per `(user_id, asset_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: UserId,
    pub asset_id: AssetId,
}
