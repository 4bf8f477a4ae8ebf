//! Block fetching methods for BlockscoutClient.

use tokio_util::sync::CancellationToken;

use super::BlockscoutClient;
use crate::client::JsonSource;
use crate::domain::{Block, BlockKind, ExplorerError, is_block_id, items_from_array};
use crate::pagination::{AggregateResult, FetchPolicy, ListEndpoint};

impl<S: JsonSource + Sync> BlockscoutClient<S> {
    /// Fetch one block by height or hash.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an id that is neither a height nor a block
    /// hash, `NotFound` for an unknown block, or the request error.
    pub async fn get_block(&self, id: &str) -> Result<Block, ExplorerError> {
        let id = id.trim();
        if !is_block_id(id) {
            return Err(ExplorerError::invalid_input(format!(
                "'{id}' is not a block number or block hash"
            )));
        }
        self.get_object(&format!("/blocks/{id}"), "block", id).await
    }

    /// Aggregate the global block listing.
    ///
    /// # Errors
    ///
    /// Fails on the first failed page request.
    pub async fn list_blocks(
        &self,
        kind: BlockKind,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<Block>, ExplorerError> {
        self.list(ListEndpoint::Blocks { kind }, policy, cancel)
            .await
    }

    /// The handful of newest blocks shown on the front page.
    ///
    /// # Errors
    ///
    /// Returns the request error or `MalformedResponse` if the body is not an
    /// array of blocks.
    pub async fn latest_blocks(&self) -> Result<Vec<Block>, ExplorerError> {
        let body = self.source.get_json("/main-page/blocks", &[]).await?;
        items_from_array(body)
    }
}
