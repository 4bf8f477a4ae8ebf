//! Blockscout API client.
//!
//! This module provides the unified `BlockscoutClient` for the `/api/v2`
//! endpoints an explorer front end needs: addresses, blocks, transactions,
//! tokens, search, and stats.
//!
//! # Example
//!
//! ```ignore
//! use crate::client::{BlockscoutClient, HttpConfig};
//! use crate::domain::NetworkConfig;
//!
//! let client = BlockscoutClient::new(NetworkConfig::default(), HttpConfig::default())?;
//! let blocks = client.latest_blocks().await?;
//! ```

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::http::{HttpConfig, HttpSource};
use super::source::JsonSource;
use crate::domain::{ExplorerError, NetworkConfig, Timestamped};
use crate::pagination::{AggregateResult, FetchPolicy, ListEndpoint, aggregate};

mod accounts;
mod blocks;
mod search;
mod transactions;


pub use accounts::AccountOverview;

// ============================================================================
// Blockscout API Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct BlockscoutClient<S = HttpSource> {
    network: NetworkConfig,
    source: S,
}

impl BlockscoutClient<HttpSource> {
    /// Creates a client for a built-in or custom network.
    ///
    /// # Errors
    ///
    /// Returns `ExplorerError::ClientInit` if the HTTP client fails to initialize.
    pub fn new(network: NetworkConfig, config: HttpConfig) -> Result<Self, ExplorerError> {
        let source = HttpSource::new(network.api_url(), config)?;
        Ok(Self::with_source(network, source))
    }
}

impl<S: JsonSource + Sync> BlockscoutClient<S> {
    /// Creates a client over an arbitrary JSON source.
    #[must_use]
    pub fn with_source(network: NetworkConfig, source: S) -> Self {
        Self { network, source }
    }

    #[must_use]
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    #[cfg(test)]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and decode a single object, mapping 404 to `NotFound`.
    pub(crate) async fn get_object<T: DeserializeOwned>(
        &self,
        path: &str,
        entity: &'static str,
        id: &str,
    ) -> Result<T, ExplorerError> {
        let body = self
            .source
            .get_json(path, &[])
            .await
            .map_err(|e| match e {
                ExplorerError::HttpStatus { status: 404, .. } => {
                    ExplorerError::not_found(entity, id)
                }
                other => other,
            })?;

        serde_json::from_value(body)
            .map_err(|e| ExplorerError::parse(format!("unexpected {entity} shape: {e}")))
    }

    /// Aggregate a paginated list endpoint.
    pub(crate) async fn list<T>(
        &self,
        endpoint: ListEndpoint,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<T>, ExplorerError>
    where
        T: DeserializeOwned + Timestamped,
    {
        aggregate(&self.source, &endpoint, policy, cancel).await
    }
}

// ============================================================================
// Input Validation
// ============================================================================

pub(crate) fn require_address(address: &str) -> Result<&str, ExplorerError> {
    let trimmed = address.trim();
    if crate::domain::is_address(trimmed) {
        Ok(trimmed)
    } else {
        Err(ExplorerError::invalid_input(format!(
            "'{trimmed}' is not an address. Expected 0x followed by 40 hex characters."
        )))
    }
}
