//! Notifier port for alert delivery.

use async_trait::async_trait;

use crate::error::Result;

/// Delivers formatted alert text to the administrative recipient.
///
/// Text may carry `<b>` tags; everything else is escaped by the caller.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}
