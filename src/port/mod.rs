//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  Monitor + ChatService  │
//!                    └─────────────────────────┘
//!                                │
//!     ┌──────────────────────────┼──────────────────────────┐
//!     ▼                          ▼                          ▼
//! ┌──────────┐            ┌─────────────┐            ┌───────────┐
//! │ Gateway  │            │   Store     │            │ Notifier  │
//! │ Adapter  │            │   Adapter   │            │  Adapter  │
//! └──────────┘            └─────────────┘            └───────────┘
//! ```

pub mod outbound;

pub use outbound::market::MarketDataGateway;
pub use outbound::notifier::AlertNotifier;
pub use outbound::store::{AlertLog, PriceHistory, SubscriptionStore};
