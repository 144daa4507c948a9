//! Telegram notifier for the administrative chat.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::port::outbound::notifier::AlertNotifier;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Chat that receives price alerts.
    pub admin_chat_id: i64,
}

/// Sends HTML-formatted alerts to the admin chat.
///
/// Each send is awaited so alerts arrive in dispatch order and a failed
/// delivery is reported to the caller.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        Self::with_bot(Bot::new(&config.bot_token), config.admin_chat_id)
    }

    /// Reuse an existing bot handle (shared with the command dispatcher).
    #[must_use]
    pub fn with_bot(bot: Bot, admin_chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(admin_chat_id),
        }
    }
}

#[async_trait]
impl AlertNotifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| {
                error!(error = %e, chat_id = self.chat_id.0, "Failed to send Telegram message");
                Error::Notify(e.to_string())
            })?;

        debug!(chat_id = self.chat_id.0, "Telegram alert delivered");
        Ok(())
    }
}
