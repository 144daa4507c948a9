//! Chat use cases, independent of the chat transport.
//!
//! Every action produces a [`ChatReply`]: HTML text plus an optional
//! keyboard. Gateway trouble never surfaces as an error to the caller;
//! the user gets a "not found / unavailable" reply instead.

use std::sync::Arc;

use tracing::{info, warn};

use super::message;
use crate::domain::time::now_ms;
use crate::domain::{AssetId, AssetRef, MarketSnapshot, Subscription, UserId};
use crate::error::Result;
use crate::port::outbound::market::MarketDataGateway;
use crate::port::outbound::store::{PriceHistory, SubscriptionStore};

pub const DEFAULT_TOP: usize = 10;
pub const MAX_TOP: usize = 25;

/// A request coming from a chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Start,
    Help,
    Top(Option<usize>),
    /// Subscribe to the asset matching the query.
    Add(String),
    /// "Add coin" button or `/add` without an argument.
    AddPrompt,
    Mine,
    /// Show metrics for the asset matching the query.
    Coin(String),
    Unknown(String),
}

/// Keyboard attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Top 10 / Add coin / My coins.
    MainMenu,
    /// One button per asset, each opening its metrics card.
    Assets(Vec<AssetId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// HTML-formatted body.
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl ChatReply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    fn with_menu(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(Keyboard::MainMenu),
        }
    }
}

const NOT_FOUND: &str = "⚠️ Coin not found. Try again.";
const UNAVAILABLE: &str = "⚠️ Could not fetch data right now.";
const ADD_USAGE: &str = "Send <code>/add &lt;coin&gt;</code>, e.g. <code>/add bitcoin</code>.";
const INTERNAL: &str = "⚠️ Something went wrong. Please try again later.";

/// Serves chat actions against the store and the market gateway.
pub struct ChatService<S> {
    store: S,
    gateway: Arc<dyn MarketDataGateway>,
}

impl<S> ChatService<S>
where
    S: PriceHistory + SubscriptionStore,
{
    pub fn new(store: S, gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self { store, gateway }
    }

    /// Handle one action for `user`. Never fails: storage errors are
    /// logged and answered with a generic apology.
    pub async fn handle(&self, user: UserId, action: ChatAction) -> ChatReply {
        let result = match action {
            ChatAction::Start => Ok(start()),
            ChatAction::Help => Ok(help()),
            ChatAction::AddPrompt => Ok(ChatReply::text(ADD_USAGE)),
            ChatAction::Unknown(command) => Ok(ChatReply::text(format!(
                "Unknown command <code>{}</code>. Try /help.",
                message::escape_html(&command)
            ))),
            ChatAction::Top(n) => Ok(self.top(n).await),
            ChatAction::Add(query) => self.add(user, &query).await,
            ChatAction::Mine => self.mine(user).await,
            ChatAction::Coin(query) => self.coin(&query).await,
        };

        result.unwrap_or_else(|e| {
            warn!(user = %user, error = %e, "Chat action failed");
            ChatReply::text(INTERNAL)
        })
    }

    /// Ranked list of the top `n` assets, at most [`MAX_TOP`].
    pub async fn top(&self, n: Option<usize>) -> ChatReply {
        let n = n.unwrap_or(DEFAULT_TOP).clamp(1, MAX_TOP);
        match self.gateway.fetch_top_assets(n).await {
            Ok(snapshots) => ChatReply::text(message::top_list(&snapshots)),
            Err(e) => {
                warn!(requested = n, error = %e, "Top assets unavailable");
                ChatReply::text(UNAVAILABLE)
            }
        }
    }

    /// Resolve, sample and subscribe `user` to the asset matching `query`.
    ///
    /// # Errors
    /// Returns an error if the store rejects a write.
    pub async fn add(&self, user: UserId, query: &str) -> Result<ChatReply> {
        if query.trim().is_empty() {
            return Ok(ChatReply::text(ADD_USAGE));
        }
        let snapshot = match self.lookup(query).await {
            Ok(snapshot) => snapshot,
            Err(reply) => return Ok(reply),
        };

        self.record(&snapshot).await?;
        self.store
            .add_subscription(&Subscription {
                user_id: user,
                asset_id: snapshot.id.clone(),
            })
            .await?;
        info!(user = %user, asset = %snapshot.id, "User subscribed");

        Ok(ChatReply::with_menu(format!(
            "✅ <b>{}</b> added to your list.",
            message::escape_html(&snapshot.symbol.to_uppercase())
        )))
    }

    /// The user's subscriptions as buttons.
    ///
    /// # Errors
    /// Returns an error if subscriptions cannot be read.
    pub async fn mine(&self, user: UserId) -> Result<ChatReply> {
        let assets = self.store.list_subscriptions(user).await?;
        if assets.is_empty() {
            return Ok(ChatReply::with_menu("You have no coins yet 😿"));
        }
        Ok(ChatReply {
            text: "📋 Your coins:".to_string(),
            keyboard: Some(Keyboard::Assets(assets)),
        })
    }

    /// Metrics card for the asset matching `query`, recording a sample.
    ///
    /// # Errors
    /// Returns an error if the sample cannot be stored.
    pub async fn coin(&self, query: &str) -> Result<ChatReply> {
        let snapshot = match self.lookup(query).await {
            Ok(snapshot) => snapshot,
            Err(reply) => return Ok(reply),
        };
        self.record(&snapshot).await?;
        Ok(ChatReply::text(message::asset_card(&snapshot)))
    }

    /// Resolve and fetch, turning any gateway miss into the reply to send.
    async fn lookup(&self, query: &str) -> std::result::Result<MarketSnapshot, ChatReply> {
        let asset: AssetRef = match self.gateway.resolve_asset(query).await {
            Ok(Some(asset)) => asset,
            Ok(None) => return Err(ChatReply::text(NOT_FOUND)),
            Err(e) => {
                warn!(query, error = %e, "Asset lookup failed");
                return Err(ChatReply::text(UNAVAILABLE));
            }
        };

        match self.gateway.fetch_snapshot(std::slice::from_ref(&asset.id)).await {
            Ok(snapshots) => snapshots
                .into_iter()
                .find(|s| s.id == asset.id)
                .ok_or_else(|| ChatReply::text(NOT_FOUND)),
            Err(e) => {
                warn!(asset = %asset.id, error = %e, "Snapshot unavailable");
                Err(ChatReply::text(UNAVAILABLE))
            }
        }
    }

    async fn record(&self, snapshot: &MarketSnapshot) -> Result<()> {
        self.store.ensure_asset_tracked(&snapshot.id).await?;
        self.store.append_sample(&snapshot.to_sample(now_ms())).await
    }
}

fn start() -> ChatReply {
    ChatReply::with_menu("👋 Hi! Pick an action below:")
}

fn help() -> ChatReply {
    ChatReply::with_menu(
        "<b>Commands</b>\n\
        /top [n] - top coins by market cap\n\
        /add &lt;coin&gt; - add a coin to your list\n\
        /mine - your coins\n\
        /coin &lt;coin&gt; - price and changes for one coin\n\
        /help - this message",
    )
}
