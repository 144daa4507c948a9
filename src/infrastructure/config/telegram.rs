//! Telegram bot configuration.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// Telegram bot configuration.
///
/// Credentials never come from the file: the token is read from
/// `BOT_TOKEN` and the admin chat from `ADMIN_ID`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Send alerts to Telegram and serve chat commands.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(skip)]
    pub bot_token: Option<String>,
    /// Chat that receives price alerts.
    #[serde(skip)]
    pub admin_id: Option<i64>,
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            bot_token: None,
            admin_id: None,
        }
    }
}
