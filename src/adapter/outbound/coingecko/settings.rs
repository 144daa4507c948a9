//! CoinGecko gateway configuration.

use serde::Deserialize;

/// HTTP settings for the CoinGecko market API.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoConfig {
    /// API base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quote currency for prices.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// How long the asset directory used for lookups stays cached.
    #[serde(default = "default_coin_list_ttl_secs")]
    pub coin_list_ttl_secs: u64,
    /// Optional API key, loaded from `COINGECKO_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.coingecko.com/api/v3".into()
}

fn default_vs_currency() -> String {
    "usd".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_coin_list_ttl_secs() -> u64 {
    3_600
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vs_currency: default_vs_currency(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            coin_list_ttl_secs: default_coin_list_ttl_secs(),
            api_key: None,
        }
    }
}
