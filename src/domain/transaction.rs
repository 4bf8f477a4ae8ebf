//! Transaction types for EVM chains indexed by Blockscout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AddressParam;
use super::page::Timestamped;

// ============================================================================
// Fee
// ============================================================================

/// Transaction fee as reported by Blockscout (`{"type": "actual", "value": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Fee in wei.
    pub value: String,
}

// ============================================================================
// Transaction
// ============================================================================

/// A transaction as returned by list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    #[serde(default)]
    block_number: Option<u64>,
    /// Older Blockscout versions call the block number `block`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block: Option<u64>,
    /// `None` for pending transactions.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from: Option<AddressParam>,
    /// `None` for contract creations.
    #[serde(default)]
    pub to: Option<AddressParam>,
    /// Value in wei.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub fee: Option<Fee>,
    /// `"ok"` or `"error"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    transaction_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_types: Option<Vec<String>>,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub nonce: Option<u64>,
    #[serde(default)]
    pub created_contract: Option<AddressParam>,
}

impl Transaction {
    #[must_use]
    pub fn block_number(&self) -> Option<u64> {
        self.block_number.or(self.block)
    }

    #[must_use]
    pub fn transaction_types(&self) -> &[String] {
        self.transaction_types
            .as_deref()
            .or(self.tx_types.as_deref())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.block_number().is_none()
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.status.as_deref(), Some("ok"))
    }

    /// Direction of this transaction relative to `address`.
    #[must_use]
    pub fn direction(&self, address: &str) -> Direction {
        fn hash(param: &Option<AddressParam>) -> Option<&str> {
            param.as_ref().map(|p| p.hash.as_str())
        }
        Direction::between(hash(&self.from), hash(&self.to), address)
    }
}

impl Timestamped for Transaction {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// Direction of a transfer seen from one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
    SelfTransfer,
    Unrelated,
}

impl Direction {
    /// Classify a move from `from` to `to` relative to `address`.
    #[must_use]
    pub fn between(from: Option<&str>, to: Option<&str>, address: &str) -> Self {
        let is = |hash: Option<&str>| hash.is_some_and(|h| h.eq_ignore_ascii_case(address));
        match (is(from), is(to)) {
            (true, true) => Self::SelfTransfer,
            (true, false) => Self::Outgoing,
            (false, true) => Self::Incoming,
            (false, false) => Self::Unrelated,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "IN",
            Self::Outgoing => "OUT",
            Self::SelfTransfer => "SELF",
            Self::Unrelated => "-",
        }
    }
}

// ============================================================================
// Internal Transaction
// ============================================================================

/// A call made during execution (`GET /addresses/{hash}/internal-transactions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalTransaction {
    #[serde(default)]
    transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    #[serde(default)]
    block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block: Option<u64>,
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub from: Option<AddressParam>,
    #[serde(default)]
    pub to: Option<AddressParam>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl InternalTransaction {
    /// Hash of the parent transaction.
    #[must_use]
    pub fn tx_hash(&self) -> Option<&str> {
        self.transaction_hash.as_deref().or(self.tx_hash.as_deref())
    }

    #[must_use]
    pub fn block_number(&self) -> Option<u64> {
        self.block_number.or(self.block)
    }
}

impl Timestamped for InternalTransaction {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// Which transactions the global listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    Validated,
    Pending,
}

impl TransactionFilter {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validated => "validated",
            Self::Pending => "pending",
        }
    }
}

/// Transaction kinds the global listing can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    TokenTransfer,
    ContractCreation,
    ContractCall,
    CoinTransfer,
    TokenCreation,
}

impl TransactionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TokenTransfer => "token_transfer",
            Self::ContractCreation => "contract_creation",
            Self::ContractCall => "contract_call",
            Self::CoinTransfer => "coin_transfer",
            Self::TokenCreation => "token_creation",
        }
    }
}

/// Filters for `GET /transactions`. Empty lists leave that dimension open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub types: Vec<TransactionType>,
    /// Method names such as `transfer` or `approve`.
    pub methods: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
