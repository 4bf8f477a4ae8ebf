//! Token, token balance, and token transfer types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::account::AddressParam;
use super::page::Timestamped;
use super::transaction::Direction;

/// Token standards requested by the account page.
pub const TOKEN_TYPES: &str = "ERC-20,ERC-721,ERC-1155";

// ============================================================================
// Token
// ============================================================================

/// Token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    address: Option<String>,
    /// Spelling used by newer Blockscout versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address_hash: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    /// Decimal places, as a string in Blockscout responses.
    #[serde(default)]
    pub decimals: Option<String>,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub holders: Option<String>,
    #[serde(default)]
    pub exchange_rate: Option<String>,
}

impl Token {
    /// Contract address of the token.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().or(self.address_hash.as_deref())
    }

    /// Parsed decimal places; 18 when absent, 0 for NFTs.
    #[must_use]
    pub fn decimals(&self) -> u32 {
        if let Some(decimals) = self.decimals.as_deref().and_then(|d| d.parse().ok()) {
            return decimals;
        }
        match self.token_type.as_deref() {
            Some("ERC-721" | "ERC-1155") => 0,
            _ => 18,
        }
    }

    /// Symbol, then name, then a shortened address.
    #[must_use]
    pub fn display_symbol(&self) -> String {
        self.symbol
            .clone()
            .or_else(|| self.name.clone())
            .or_else(|| self.address().map(crate::render::shorten_hash))
            .unwrap_or_else(|| "-".to_string())
    }
}

// ============================================================================
// Token Balance
// ============================================================================

/// One holding from `GET /addresses/{hash}/tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token: Token,
    /// Raw amount in the token's smallest unit.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
}

impl Timestamped for TokenBalance {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }
}

// ============================================================================
// Token Transfer
// ============================================================================

/// One transfer from `GET /addresses/{hash}/token-transfers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransfer {
    #[serde(default)]
    transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    pub from: AddressParam,
    pub to: AddressParam,
    pub token: Token,
    /// `{"decimals": "18", "value": "..."}` for fungible tokens,
    /// `{"token_id": "..."}` for NFTs.
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub block_number: Option<u64>,
}

impl TokenTransfer {
    #[must_use]
    pub fn transaction_hash(&self) -> Option<&str> {
        self.transaction_hash.as_deref().or(self.tx_hash.as_deref())
    }

    /// Direction of this transfer relative to `address`.
    #[must_use]
    pub fn direction(&self, address: &str) -> Direction {
        Direction::between(Some(&self.from.hash), Some(&self.to.hash), address)
    }

    /// Raw amount for fungible transfers.
    #[must_use]
    pub fn amount(&self) -> Option<&str> {
        self.total.as_ref()?.get("value")?.as_str()
    }

    /// Token id for NFT transfers.
    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        self.total.as_ref()?.get("token_id")?.as_str()
    }
}

impl Timestamped for TokenTransfer {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

// ============================================================================
// Tests
// ============================================================================
