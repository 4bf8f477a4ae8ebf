//! Transaction fetching methods for BlockscoutClient.

use tokio_util::sync::CancellationToken;

use super::BlockscoutClient;
use crate::client::JsonSource;
use crate::domain::{
    ExplorerError, Transaction, TransactionQuery, is_transaction_hash, items_from_array,
};
use crate::pagination::{AggregateResult, FetchPolicy, ListEndpoint};

impl<S: JsonSource + Sync> BlockscoutClient<S> {
    /// Fetch a single transaction by hash.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed hash, `NotFound` for an unknown
    /// one, or the request error.
    pub async fn get_transaction(&self, hash: &str) -> Result<Transaction, ExplorerError> {
        let hash = hash.trim();
        if !is_transaction_hash(hash) {
            return Err(ExplorerError::invalid_input(format!(
                "'{hash}' is not a transaction hash. Expected 0x followed by 64 hex characters."
            )));
        }
        self.get_object(&format!("/transactions/{hash}"), "transaction", hash)
            .await
    }

    /// Aggregate the global transaction listing, narrowed by `query`.
    ///
    /// # Errors
    ///
    /// Fails on the first failed page request.
    pub async fn list_transactions(
        &self,
        query: TransactionQuery,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<Transaction>, ExplorerError> {
        self.list(ListEndpoint::Transactions { query }, policy, cancel)
            .await
    }

    /// The newest transactions shown on the front page.
    ///
    /// # Errors
    ///
    /// Returns the request error or `MalformedResponse` if the body is not an
    /// array of transactions.
    pub async fn latest_transactions(&self) -> Result<Vec<Transaction>, ExplorerError> {
        let body = self.source.get_json("/main-page/transactions", &[]).await?;
        items_from_array(body)
    }
}
