//! Telegram command and callback parsing.

use crate::application::chat::ChatAction;

/// Callback data of the main menu buttons.
pub(super) const CALLBACK_TOP: &str = "menu:top";
pub(super) const CALLBACK_ADD: &str = "menu:add";
pub(super) const CALLBACK_MINE: &str = "menu:mine";
/// Prefix of per-asset buttons, followed by the gateway id.
pub(super) const CALLBACK_COIN_PREFIX: &str = "coin:";

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    InvalidCount(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::InvalidCount(value) => write!(f, "invalid count `{value}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a chat action.
///
/// Unknown commands parse to [`ChatAction::Unknown`] so the user gets a hint.
pub fn parse_command(text: &str) -> Result<ChatAction, CommandParseError> {
    let text = text.trim();
    let (raw_command, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);
    let argument = rest.trim();

    match command {
        "/start" => Ok(ChatAction::Start),
        "/help" => Ok(ChatAction::Help),
        "/top" => {
            if argument.is_empty() {
                return Ok(ChatAction::Top(None));
            }
            argument
                .parse::<usize>()
                .map(|n| ChatAction::Top(Some(n)))
                .map_err(|_| CommandParseError::InvalidCount(argument.to_string()))
        }
        "/add" if argument.is_empty() => Ok(ChatAction::AddPrompt),
        "/add" => Ok(ChatAction::Add(argument.to_string())),
        "/mine" => Ok(ChatAction::Mine),
        "/coin" if argument.is_empty() => Ok(ChatAction::Help),
        "/coin" => Ok(ChatAction::Coin(argument.to_string())),
        other => Ok(ChatAction::Unknown(other.to_string())),
    }
}

/// Parse inline button data. `None` for data this bot never produced.
#[must_use]
pub fn parse_callback(data: &str) -> Option<ChatAction> {
    match data {
        CALLBACK_TOP => Some(ChatAction::Top(None)),
        CALLBACK_ADD => Some(ChatAction::AddPrompt),
        CALLBACK_MINE => Some(ChatAction::Mine),
        other => other
            .strip_prefix(CALLBACK_COIN_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| ChatAction::Coin(id.to_string())),
    }
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("top", "Top coins by market cap"),
        ("add", "Add a coin to your list"),
        ("mine", "Your coins"),
        ("coin", "Price and changes for one coin"),
        ("help", "Show all commands"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_commands() {
        assert_eq!(parse_command("/start").unwrap(), ChatAction::Start);
        assert_eq!(parse_command("/help").unwrap(), ChatAction::Help);
        assert_eq!(parse_command("/mine").unwrap(), ChatAction::Mine);
        assert_eq!(parse_command("/top").unwrap(), ChatAction::Top(None));
    }

    #[test]
    fn parse_command_with_bot_mention() {
        assert_eq!(
            parse_command("/top@pricewatch_bot 5").unwrap(),
            ChatAction::Top(Some(5))
        );
    }

    #[test]
    fn add_keeps_multi_word_names() {
        assert_eq!(
            parse_command("/add  shiba inu ").unwrap(),
            ChatAction::Add("shiba inu".into())
        );
        assert_eq!(parse_command("/add").unwrap(), ChatAction::AddPrompt);
    }

    #[test]
    fn coin_without_argument_falls_back_to_help() {
        assert_eq!(parse_command("/coin").unwrap(), ChatAction::Help);
        assert_eq!(
            parse_command("/coin eth").unwrap(),
            ChatAction::Coin("eth".into())
        );
    }

    #[test]
    fn top_rejects_non_numeric_count() {
        assert_eq!(
            parse_command("/top many"),
            Err(CommandParseError::InvalidCount("many".into()))
        );
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("bitcoin"), Err(CommandParseError::NotACommand));
        assert_eq!(parse_command(""), Err(CommandParseError::NotACommand));
    }

    #[test]
    fn unknown_command_is_passed_through() {
        assert_eq!(
            parse_command("/moon").unwrap(),
            ChatAction::Unknown("/moon".into())
        );
    }

    #[test]
    fn parse_menu_and_coin_callbacks() {
        assert_eq!(parse_callback("menu:top"), Some(ChatAction::Top(None)));
        assert_eq!(parse_callback("menu:add"), Some(ChatAction::AddPrompt));
        assert_eq!(parse_callback("menu:mine"), Some(ChatAction::Mine));
        assert_eq!(
            parse_callback("coin:usd-coin"),
            Some(ChatAction::Coin("usd-coin".into()))
        );
        assert_eq!(parse_callback("coin:"), None);
        assert_eq!(parse_callback("menu:other"), None);
    }

    #[test]
    fn bot_commands_cover_every_menu_entry() {
        let names: Vec<&str> = bot_commands().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["top", "add", "mine", "coin", "help"]);
    }
}
