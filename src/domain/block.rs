//! Block types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AddressParam;
use super::page::Timestamped;

// ============================================================================
// Block
// ============================================================================

/// A block as returned by `GET /blocks`, `GET /blocks/{id}` and
/// `GET /main-page/blocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub parent_hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    transactions_count: Option<u64>,
    /// Spelling used by older Blockscout versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_count: Option<u64>,
    #[serde(default)]
    pub miner: Option<AddressParam>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub gas_limit: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub base_fee_per_gas: Option<String>,
}

impl Block {
    #[must_use]
    pub fn transactions_count(&self) -> u64 {
        self.transactions_count.or(self.tx_count).unwrap_or(0)
    }

    /// Gas used as a percentage of the gas limit.
    #[must_use]
    pub fn gas_utilization(&self) -> Option<f64> {
        let used: f64 = self.gas_used.as_deref()?.parse().ok()?;
        let limit: f64 = self.gas_limit.as_deref()?.parse().ok()?;
        (limit > 0.0).then(|| used / limit * 100.0)
    }
}

impl Timestamped for Block {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// Kind of block listing (`GET /blocks?type=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    Block,
    Uncle,
    Reorg,
}

impl BlockKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Uncle => "uncle",
            Self::Reorg => "reorg",
        }
    }
}

/// Whether a block lookup key is a height or a hash.
///
/// # Returns
///
/// `true` for a decimal height or a `0x`-prefixed 32-byte hash.
#[must_use]
pub fn is_block_id(id: &str) -> bool {
    let id = id.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        return id.parse::<u64>().is_ok();
    }
    super::is_hex_hash(id, 64)
}

// ============================================================================
// Tests
// ============================================================================
