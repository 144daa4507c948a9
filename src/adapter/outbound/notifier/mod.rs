//! Notification adapters.
//!
//! Implements [`AlertNotifier`] for the supported backends.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::port::outbound::notifier::AlertNotifier;

#[cfg(feature = "telegram")]
pub mod telegram;

/// Notifier that writes alerts to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        info!(alert = %text, "Price alert");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_never_fails() {
        assert!(LogNotifier.send("<b>PRICE CHANGE</b>").await.is_ok());
    }
}
