//! Inline keyboard builders.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

use super::command::{CALLBACK_ADD, CALLBACK_COIN_PREFIX, CALLBACK_MINE, CALLBACK_TOP};
use crate::application::chat::Keyboard;
use crate::domain::AssetId;

/// Telegram rejects callback data longer than this many bytes.
const MAX_CALLBACK_BYTES: usize = 64;

fn btn(text: &str, callback_data: String) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.to_string(), callback_data)
}

/// Top 10 / Add coin / My coins, one per row.
#[must_use]
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![btn("📊 Top 10 coins", CALLBACK_TOP.to_string())],
        vec![btn("➕ Add coin", CALLBACK_ADD.to_string())],
        vec![btn("📋 My coins", CALLBACK_MINE.to_string())],
    ])
}

/// One button per asset opening its metrics card.
#[must_use]
pub fn asset_keyboard(assets: &[AssetId]) -> InlineKeyboardMarkup {
    let rows = assets
        .iter()
        .filter_map(|asset| {
            let data = format!("{CALLBACK_COIN_PREFIX}{asset}");
            if data.len() > MAX_CALLBACK_BYTES {
                warn!(asset = %asset, "Asset id too long for a callback button");
                return None;
            }
            Some(vec![btn(&asset.as_str().to_uppercase(), data)])
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub(super) fn render(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    match keyboard {
        Keyboard::MainMenu => main_menu(),
        Keyboard::Assets(assets) => asset_keyboard(assets),
    }
}
