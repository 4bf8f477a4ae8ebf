//! Account (address) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::page::Timestamped;

// ============================================================================
// Address Reference
// ============================================================================

/// An address as embedded in other records (`from`, `to`, `miner`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParam {
    pub hash: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_contract: bool,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

impl AddressParam {
    /// Name tag if the explorer knows one, otherwise the hash.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.hash)
    }
}

// ============================================================================
// Account Summary
// ============================================================================

/// Address summary returned by `GET /addresses/{hash}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub hash: String,
    /// Native balance in wei, as a decimal string.
    #[serde(default)]
    pub coin_balance: Option<String>,
    #[serde(default)]
    pub is_contract: bool,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub block_number_balance_updated_at: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub creator_address_hash: Option<String>,
    #[serde(default)]
    pub creation_tx_hash: Option<String>,
}

impl Account {
    /// "Contract" or "EOA".
    #[must_use]
    pub fn kind(&self) -> &'static str {
        if self.is_contract { "Contract" } else { "EOA" }
    }
}

// ============================================================================
// Coin Balance History
// ============================================================================

/// One entry of `GET /addresses/{hash}/coin-balance-history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinBalanceChange {
    pub block_number: u64,
    /// Balance after the change, in wei.
    pub value: String,
    /// Signed change, in wei.
    #[serde(default)]
    pub delta: Option<String>,
    #[serde(default)]
    transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    #[serde(default)]
    pub block_timestamp: Option<DateTime<Utc>>,
}

impl CoinBalanceChange {
    /// Transaction that caused the change, absent for block rewards.
    #[must_use]
    pub fn transaction_hash(&self) -> Option<&str> {
        self.transaction_hash.as_deref().or(self.tx_hash.as_deref())
    }
}

impl Timestamped for CoinBalanceChange {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.block_timestamp
    }
}

// ============================================================================
// Tests
// ============================================================================
