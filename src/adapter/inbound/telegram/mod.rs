//! Telegram chat surface: command parsing, keyboards and the dispatcher.

mod command;
mod dispatcher;
mod keyboard;

pub use command::{bot_commands, parse_callback, parse_command, CommandParseError};
pub use dispatcher::ChatBot;
pub use keyboard::{asset_keyboard, main_menu};
