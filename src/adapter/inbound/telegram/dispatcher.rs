//! teloxide dispatcher serving chat commands and button presses.

use std::sync::Arc;

use teloxide::dispatching::{Dispatcher, ShutdownToken, UpdateFilterExt};
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ParseMode};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::command::{bot_commands, parse_callback, parse_command, CommandParseError};
use super::keyboard::render;
use crate::application::chat::{ChatReply, ChatService};
use crate::domain::UserId as AppUserId;
use crate::port::outbound::store::{PriceHistory, SubscriptionStore};

/// Running chat bot.
pub struct ChatBot {
    shutdown: ShutdownToken,
    task: JoinHandle<()>,
}

impl ChatBot {
    /// Register the command menu and start long polling in the background.
    pub async fn spawn<S>(bot: Bot, service: Arc<ChatService<S>>) -> Self
    where
        S: PriceHistory + SubscriptionStore + 'static,
    {
        if let Err(e) = register_bot_commands(&bot).await {
            warn!(error = %e, "Failed to register bot commands with Telegram");
        }

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message::<S>))
            .branch(Update::filter_callback_query().endpoint(on_callback::<S>));

        let mut dispatcher = Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![service])
            .default_handler(|update| async move {
                debug!(update_id = ?update.id, "Ignoring unsupported update");
            })
            .build();
        let shutdown = dispatcher.shutdown_token();

        let task = tokio::spawn(async move {
            info!("Telegram chat listener started");
            dispatcher.dispatch().await;
            info!("Telegram chat listener stopped");
        });

        Self { shutdown, task }
    }

    /// Stop polling and wait for in-flight handlers.
    pub async fn shutdown(self) {
        match self.shutdown.shutdown() {
            Ok(done) => done.await,
            Err(_) => debug!("Dispatcher was not running"),
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "Telegram chat listener task failed");
        }
    }
}

fn app_user(user: &teloxide::types::User) -> Option<AppUserId> {
    i64::try_from(user.id.0).ok().map(AppUserId)
}

async fn on_message<S>(
    bot: Bot,
    msg: Message,
    service: Arc<ChatService<S>>,
) -> ResponseResult<()>
where
    S: PriceHistory + SubscriptionStore + 'static,
{
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref().and_then(app_user) else {
        return Ok(());
    };

    let action = match parse_command(text) {
        Ok(action) => action,
        Err(CommandParseError::NotACommand) => return Ok(()),
        Err(e) => {
            bot.send_message(msg.chat.id, format!("⚠️ {e}")).await?;
            return Ok(());
        }
    };

    debug!(user = %user, action = ?action, "Chat command");
    let reply = service.handle(user, action).await;
    send_reply(&bot, msg.chat.id, reply).await
}

async fn on_callback<S>(
    bot: Bot,
    query: CallbackQuery,
    service: Arc<ChatService<S>>,
) -> ResponseResult<()>
where
    S: PriceHistory + SubscriptionStore + 'static,
{
    // Answer first so the client stops showing the loading indicator.
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(action) = query.data.as_deref().and_then(parse_callback) else {
        warn!(data = ?query.data, "Unrecognised callback data");
        return Ok(());
    };
    let Some(user) = app_user(&query.from) else {
        return Ok(());
    };
    let chat_id = query
        .message
        .as_ref()
        .map_or_else(|| ChatId::from(query.from.id), |m| m.chat().id);

    let reply = service.handle(user, action).await;
    send_reply(&bot, chat_id, reply).await
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: ChatReply) -> ResponseResult<()> {
    let request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(render(&keyboard)).await?,
        None => request.await?,
    };
    Ok(())
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
