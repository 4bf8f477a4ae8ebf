//! Search and statistics for BlockscoutClient.

use super::BlockscoutClient;
use crate::client::JsonSource;
use crate::domain::{ExplorerError, NetworkStats, Page, Route, SearchHit, parse_search_items};

impl<S: JsonSource + Sync> BlockscoutClient<S> {
    /// Free-text search over addresses, transactions, blocks, and tokens.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty query, `MalformedResponse` for an
    /// unexpected body, or the request error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ExplorerError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ExplorerError::invalid_input("Search query cannot be empty"));
        }

        let body = self
            .source
            .get_json("/search", &[("q".to_string(), query.to_string())])
            .await?;
        let page = Page::<serde_json::Value>::from_json(body)?;
        parse_search_items(page.items)
    }

    /// Resolve a query to the page its first navigable hit points at.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing navigable matches.
    pub async fn resolve(&self, query: &str) -> Result<Route, ExplorerError> {
        self.search(query)
            .await?
            .iter()
            .find_map(SearchHit::route)
            .ok_or_else(|| ExplorerError::not_found("search result", query.trim()))
    }

    /// Network-wide statistics.
    ///
    /// # Errors
    ///
    /// Returns the request error or `MalformedResponse`.
    pub async fn stats(&self) -> Result<NetworkStats, ExplorerError> {
        self.get_object("/stats", "stats", "network").await
    }
}
