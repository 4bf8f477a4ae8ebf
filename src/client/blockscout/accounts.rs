//! Address fetching methods for BlockscoutClient.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use super::{BlockscoutClient, require_address};
use crate::client::JsonSource;
use crate::domain::{
    Account, CoinBalanceChange, ExplorerError, InternalTransaction, TokenBalance, TokenTransfer,
    Transaction,
};
use crate::pagination::{AggregateResult, FetchPolicy, ListEndpoint};

/// Everything the account page shows, fetched in one go.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountOverview {
    pub account: Account,
    pub transactions: AggregateResult<Transaction>,
    pub tokens: AggregateResult<TokenBalance>,
    pub token_transfers: AggregateResult<TokenTransfer>,
    /// Timestamp of the earliest transaction seen within the page ceiling.
    pub first_transaction_at: Option<DateTime<Utc>>,
}

impl<S: JsonSource + Sync> BlockscoutClient<S> {
    /// Fetch the address summary.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed address, `NotFound` for an
    /// unknown one, or the underlying request error.
    pub async fn get_account(&self, address: &str) -> Result<Account, ExplorerError> {
        let address = require_address(address)?;
        self.get_object(&format!("/addresses/{address}"), "account", address)
            .await
    }

    /// Aggregate the address's transaction history, newest first.
    ///
    /// # Errors
    ///
    /// Fails on the first failed page request.
    pub async fn account_transactions(
        &self,
        address: &str,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<Transaction>, ExplorerError> {
        let address = require_address(address)?.to_string();
        self.list(ListEndpoint::AddressTransactions { address }, policy, cancel)
            .await
    }

    /// Aggregate ERC-20/721/1155 transfers in or out of the address.
    ///
    /// # Errors
    ///
    /// Fails on the first failed page request.
    pub async fn account_token_transfers(
        &self,
        address: &str,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<TokenTransfer>, ExplorerError> {
        let address = require_address(address)?.to_string();
        self.list(ListEndpoint::AddressTokenTransfers { address }, policy, cancel)
            .await
    }

    /// Aggregate token holdings.
    ///
    /// # Errors
    ///
    /// Fails on the first failed page request.
    pub async fn account_tokens(
        &self,
        address: &str,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<TokenBalance>, ExplorerError> {
        let address = require_address(address)?.to_string();
        self.list(ListEndpoint::AddressTokens { address }, policy, cancel)
            .await
    }

    pub async fn account_internal_transactions(
        &self,
        address: &str,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<InternalTransaction>, ExplorerError> {
        let address = require_address(address)?.to_string();
        self.list(
            ListEndpoint::AddressInternalTransactions { address },
            policy,
            cancel,
        )
        .await
    }

    pub async fn account_coin_balance_history(
        &self,
        address: &str,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult<CoinBalanceChange>, ExplorerError> {
        let address = require_address(address)?.to_string();
        self.list(
            ListEndpoint::AddressCoinBalanceHistory { address },
            policy,
            cancel,
        )
        .await
    }

    /// Fetch the summary and the three list tabs concurrently.
    ///
    /// Each list is an independent aggregation. The overview fails as a whole
    /// if any part fails; the remaining requests are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any of the four fetches.
    pub async fn account_overview(
        &self,
        address: &str,
        policy: &FetchPolicy,
        cancel: &CancellationToken,
    ) -> Result<AccountOverview, ExplorerError> {
        let address = require_address(address)?;

        let (account, transactions, tokens, token_transfers) = tokio::try_join!(
            self.get_account(address),
            self.account_transactions(address, policy, cancel),
            self.account_tokens(address, policy, cancel),
            self.account_token_transfers(address, policy, cancel),
        )?;

        tracing::debug!(
            "Account {address}: {} transactions, {} tokens, {} transfers",
            transactions.len(),
            tokens.len(),
            token_transfers.len()
        );

        Ok(AccountOverview {
            first_transaction_at: transactions.earliest,
            account,
            transactions,
            tokens,
            token_transfers,
        })
    }
}
