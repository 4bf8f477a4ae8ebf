//! Paginated aggregation over Blockscout list endpoints.
//!
//! A list endpoint is walked page by page, following `next_page_params`,
//! until it runs out, returns an empty page, or a page ceiling is hit. The
//! pages are folded into one ordered [`AggregateResult`].
//!
//! # Example
//!
//! ```ignore
//! use crate::pagination::{FetchPolicy, ListEndpoint, aggregate};
//!
//! let endpoint = ListEndpoint::AddressTransactions { address: addr.to_string() };
//! let history = aggregate::<_, Transaction>(&client, &endpoint, &FetchPolicy::default(), &cancel).await?;
//! println!("first seen {:?}", history.earliest);
//! ```

use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_MAX_PAGES;
use crate::domain::{
    BlockKind, ExplorerError, PageCursor, TOKEN_TYPES, Timestamped, TransactionQuery,
    TransactionType,
};

mod aggregate;

#[cfg(test)]
mod tests;

pub use aggregate::aggregate;

/// Filter value Blockscout expects for "either direction".
const DIRECTION_FILTER: &str = "to | from";

// ============================================================================
// Fetch Policy
// ============================================================================

/// Bounds for one aggregation. Fixed for the duration of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Hard ceiling on requests issued.
    pub max_pages: usize,
    /// Sent as `limit` when set; Blockscout otherwise picks its own size.
    pub page_size: Option<u32>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_size: None,
        }
    }
}

impl FetchPolicy {
    #[must_use]
    pub fn with_max_pages(max_pages: usize) -> Self {
        Self {
            max_pages,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero page ceiling or zero page size.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        if self.max_pages == 0 {
            return Err(ExplorerError::invalid_input("max_pages must be at least 1"));
        }
        if self.page_size == Some(0) {
            return Err(ExplorerError::invalid_input("page_size must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// List Endpoints
// ============================================================================

/// Endpoint template for a paginated list, parameterized by its subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEndpoint {
    AddressTransactions { address: String },
    AddressTokenTransfers { address: String },
    AddressTokens { address: String },
    AddressInternalTransactions { address: String },
    AddressCoinBalanceHistory { address: String },
    Blocks { kind: BlockKind },
    Transactions { query: TransactionQuery },
}

impl ListEndpoint {
    /// Path relative to the API base.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::AddressTransactions { address } => format!("/addresses/{address}/transactions"),
            Self::AddressTokenTransfers { address } => {
                format!("/addresses/{address}/token-transfers")
            }
            Self::AddressTokens { address } => format!("/addresses/{address}/tokens"),
            Self::AddressInternalTransactions { address } => {
                format!("/addresses/{address}/internal-transactions")
            }
            Self::AddressCoinBalanceHistory { address } => {
                format!("/addresses/{address}/coin-balance-history")
            }
            Self::Blocks { .. } => "/blocks".to_string(),
            Self::Transactions { .. } => "/transactions".to_string(),
        }
    }

    /// Fixed query parameters sent with every page.
    #[must_use]
    pub fn base_query(&self) -> Vec<(String, String)> {
        let pair = |k: &str, v: &str| (k.to_string(), v.to_string());
        match self {
            Self::AddressTransactions { .. } => vec![pair("filter", DIRECTION_FILTER)],
            Self::AddressTokenTransfers { .. } => vec![
                pair("type", TOKEN_TYPES),
                pair("filter", DIRECTION_FILTER),
            ],
            Self::AddressTokens { .. } => vec![pair("type", TOKEN_TYPES)],
            Self::AddressInternalTransactions { .. } | Self::AddressCoinBalanceHistory { .. } => {
                Vec::new()
            }
            Self::Blocks { kind } => vec![pair("type", kind.as_str())],
            Self::Transactions { query } => {
                let mut pairs = vec![pair("filter", query.filter.as_str())];
                if !query.types.is_empty() {
                    let types: Vec<&str> = query.types.iter().map(TransactionType::as_str).collect();
                    pairs.push(pair("type", &types.join(",")));
                }
                if !query.methods.is_empty() {
                    pairs.push(pair("method", &query.methods.join(",")));
                }
                pairs
            }
        }
    }

    /// Full query for one request: base query, page size, then cursor fields.
    #[must_use]
    pub fn request_query(
        &self,
        policy: &FetchPolicy,
        cursor: Option<&PageCursor>,
    ) -> Vec<(String, String)> {
        let mut query = self.base_query();
        if let Some(size) = policy.page_size {
            query.push(("limit".to_string(), size.to_string()));
        }
        if let Some(cursor) = cursor {
            query.extend(cursor.to_query());
        }
        query
    }

    /// Short name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AddressTransactions { .. } => "address transactions",
            Self::AddressTokenTransfers { .. } => "address token transfers",
            Self::AddressTokens { .. } => "address tokens",
            Self::AddressInternalTransactions { .. } => "address internal transactions",
            Self::AddressCoinBalanceHistory { .. } => "address coin balance history",
            Self::Blocks { .. } => "blocks",
            Self::Transactions { .. } => "transactions",
        }
    }
}

// ============================================================================
// Aggregate Result
// ============================================================================

/// Why an aggregation stopped requesting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page ceiling was reached; more data may exist.
    PageLimit,
    /// The API returned no continuation cursor.
    Exhausted,
    /// A page came back with zero items.
    EmptyPage,
}

/// Every item of every fetched page, plus summaries derived while folding.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult<T> {
    /// Items in fetch order, each page in API order.
    pub items: Vec<T>,
    pub pages_fetched: usize,
    /// Earliest item timestamp; `None` when no item carried one.
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub stop: StopReason,
}

impl<T> AggregateResult<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `false` when the page ceiling cut the listing short.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stop != StopReason::PageLimit
    }
}

/// Running state of one aggregation.
#[derive(Debug)]
pub(crate) struct Accumulator<T> {
    items: Vec<T>,
    pages_fetched: usize,
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
}

impl<T: Timestamped> Accumulator<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            pages_fetched: 0,
            earliest: None,
            latest: None,
        }
    }

    /// Fold one page in.
    pub(crate) fn push_page(&mut self, page_items: Vec<T>) {
        for item in &page_items {
            if let Some(ts) = item.timestamp() {
                self.earliest = Some(self.earliest.map_or(ts, |cur| cur.min(ts)));
                self.latest = Some(self.latest.map_or(ts, |cur| cur.max(ts)));
            }
        }
        self.items.extend(page_items);
        self.pages_fetched += 1;
    }

    pub(crate) fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub(crate) fn item_count(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn finish(self, stop: StopReason) -> AggregateResult<T> {
        AggregateResult {
            items: self.items,
            pages_fetched: self.pages_fetched,
            earliest: self.earliest,
            latest: self.latest,
            stop,
        }
    }
}
