//! Provider-agnostic domain types and the spike detector.

pub mod alert;
pub mod id;
pub mod sample;
pub mod spike;
pub mod time;

pub use alert::{SentAlert, Subscription};
pub use id::{sanitize_key, AssetId, UserId};
pub use sample::{AssetRef, MarketSnapshot, PriceSample};
pub use spike::{assess, SpikeAssessment, WindowMove};
