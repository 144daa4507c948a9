//! Identifier types for assets and chat users.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset identifier as understood by the market data provider.
///
/// The inner String is private and always trimmed and lower-cased, so
/// `"Bitcoin "` and `"bitcoin"` are the same asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Create a new `AssetId`, normalizing case and surrounding whitespace.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    /// Get the provider id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which this asset's history is persisted.
    ///
    /// Deterministic: the same logical asset always maps to the same key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        sanitize_key(&self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Lower-case `raw` and drop every character outside `[A-Za-z0-9_]`.
#[must_use]
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Chat user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_is_normalized() {
        assert_eq!(AssetId::new("  Bitcoin ").as_str(), "bitcoin");
        assert_eq!(AssetId::from("ETH"), AssetId::from("eth"));
    }

    #[test]
    fn storage_key_strips_structural_characters() {
        assert_eq!(AssetId::new("usd-coin").storage_key(), "usdcoin");
        assert_eq!(
            AssetId::new("x\"; DROP TABLE y; --").storage_key(),
            "xdroptabley"
        );
        assert_eq!(AssetId::new("wrapped_btc").storage_key(), "wrapped_btc");
    }

    #[test]
    fn storage_key_is_deterministic() {
        let a = AssetId::new("Shiba-Inu");
        let b = AssetId::new("shiba-inu");
        assert_eq!(a.storage_key(), b.storage_key());
    }

    #[test]
    fn sanitize_key_drops_non_ascii() {
        assert_eq!(sanitize_key("café"), "caf");
    }
}
