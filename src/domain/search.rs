//! Search results (`GET /search?q=...`).

use serde::Deserialize;

use super::error::ExplorerError;

// ============================================================================
// Search Hit
// ============================================================================

/// One search result, keyed by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHit {
    Address { hash: String, name: Option<String> },
    Contract { hash: String, name: Option<String> },
    Transaction { hash: String },
    Block { hash: String, height: Option<u64> },
    Token {
        address: String,
        name: Option<String>,
        symbol: Option<String>,
    },
    /// Result kinds this explorer cannot navigate to (labels, ENS, ...).
    Other { kind: String, label: Option<String> },
}

/// Where a search hit leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Account(String),
    Transaction(String),
    Block(String),
}

impl SearchHit {
    /// The page a hit resolves to. Tokens open their contract account.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        match self {
            Self::Address { hash, .. } | Self::Contract { hash, .. } => {
                Some(Route::Account(hash.clone()))
            }
            Self::Token { address, .. } => Some(Route::Account(address.clone())),
            Self::Transaction { hash } => Some(Route::Transaction(hash.clone())),
            Self::Block { hash, height } => Some(Route::Block(
                height.map_or_else(|| hash.clone(), |h| h.to_string()),
            )),
            Self::Other { .. } => None,
        }
    }

    /// Short kind label for listings.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Address { .. } => "address",
            Self::Contract { .. } => "contract",
            Self::Transaction { .. } => "transaction",
            Self::Block { .. } => "block",
            Self::Token { .. } => "token",
            Self::Other { kind, .. } => kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    address_hash: Option<String>,
    #[serde(default)]
    tx_hash: Option<String>,
    #[serde(default)]
    transaction_hash: Option<String>,
    #[serde(default)]
    block_hash: Option<String>,
    #[serde(default)]
    block_number: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
}

impl TryFrom<RawSearchItem> for SearchHit {
    type Error = ExplorerError;

    fn try_from(raw: RawSearchItem) -> Result<Self, Self::Error> {
        let missing = |field: &str| {
            ExplorerError::parse(format!("search result of type '{}' has no {field}", raw.kind))
        };
        let address = raw.address.clone().or_else(|| raw.address_hash.clone());

        Ok(match raw.kind.as_str() {
            "address" => Self::Address {
                hash: address.ok_or_else(|| missing("address"))?,
                name: raw.name,
            },
            "contract" => Self::Contract {
                hash: address.ok_or_else(|| missing("address"))?,
                name: raw.name,
            },
            "transaction" => Self::Transaction {
                hash: raw
                    .tx_hash
                    .clone()
                    .or_else(|| raw.transaction_hash.clone())
                    .ok_or_else(|| missing("tx_hash"))?,
            },
            "block" => Self::Block {
                hash: raw.block_hash.clone().ok_or_else(|| missing("block_hash"))?,
                height: raw.block_number,
            },
            "token" => Self::Token {
                address: address.ok_or_else(|| missing("address"))?,
                name: raw.name,
                symbol: raw.symbol,
            },
            _ => Self::Other {
                label: raw.name,
                kind: raw.kind.clone(),
            },
        })
    }
}

/// Parse the `items` of a search response into hits.
///
/// # Errors
///
/// Returns `MalformedResponse` if an item lacks `type` or the identifier its
/// type requires.
pub fn parse_search_items(items: Vec<serde_json::Value>) -> Result<Vec<SearchHit>, ExplorerError> {
    items
        .into_iter()
        .map(|raw| {
            let raw: RawSearchItem = serde_json::from_value(raw)
                .map_err(|e| ExplorerError::parse(format!("search result: {e}")))?;
            SearchHit::try_from(raw)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
