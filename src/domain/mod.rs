//! Domain types for the eduscan explorer.
//!
//! This module contains the typed Blockscout records the client returns and
//! the schema validation applied to every list response.
//!
//! # Module Organization
//!
//! - [`error`] - Error taxonomy for explorer operations
//! - [`network`] - Built-in and custom Blockscout instances
//! - [`cursor`] - Continuation cursors (`next_page_params`)
//! - [`page`] - Page schema validation and the [`Timestamped`] trait
//! - [`account`], [`block`], [`transaction`], [`token`] - List item types
//! - [`stats`], [`search`] - Front-page statistics and search hits

// ============================================================================
// Module Declarations
// ============================================================================

pub mod account;
pub mod block;
pub mod cursor;
pub mod error;
pub mod network;
pub mod page;
pub mod search;
pub mod stats;
pub mod token;
pub mod transaction;

// ============================================================================
// Re-exports
// ============================================================================

pub use account::{Account, AddressParam, CoinBalanceChange};
pub use block::{Block, BlockKind, is_block_id};
pub use cursor::PageCursor;
pub use error::ExplorerError;
pub use network::{CustomNetwork, Network, NetworkConfig};
pub use page::{Page, Timestamped, items_from_array};
pub use search::{Route, SearchHit, parse_search_items};
pub use stats::{GasPrice, NetworkStats};
pub use token::{TOKEN_TYPES, TokenBalance, TokenTransfer};
pub use transaction::{
    InternalTransaction, Transaction, TransactionFilter, TransactionQuery, TransactionType,
};

// ============================================================================
// Identifier Validation
// ============================================================================

/// `0x` followed by exactly `hex_len` hex digits.
#[must_use]
pub fn is_hex_hash(value: &str, hex_len: usize) -> bool {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == hex_len && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// A 20-byte EVM address.
#[must_use]
pub fn is_address(value: &str) -> bool {
    is_hex_hash(value.trim(), 40)
}

/// A 32-byte transaction hash.
#[must_use]
pub fn is_transaction_hash(value: &str) -> bool {
    is_hex_hash(value.trim(), 64)
}
