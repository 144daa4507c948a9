//! CoinGecko market data gateway.

mod client;
pub mod dto;
pub mod settings;

pub use client::CoinGeckoClient;
pub use settings::CoinGeckoConfig;
