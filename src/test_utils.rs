//! Shared test utilities and Mother pattern factories.
//!
//! `JsonMother` builds Blockscout-shaped JSON bodies; `ScriptedSource`
//! replays canned responses per path and records every request so tests can
//! assert on request counts and cursor chaining.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use serde_json::{Value, json};

use crate::client::JsonSource;
use crate::domain::ExplorerError;

// ============================================================================
// JSON Mother
// ============================================================================

pub struct JsonMother;

impl JsonMother {
    pub const ADDRESS: &'static str = "0x00000000000000000000000000000000000000aa";
    pub const OTHER: &'static str = "0x0000000000000000000000000000000000000bbb";
    pub const MINER: &'static str = "0x00000000000000000000000000000000000000cc";
    pub const TOKEN: &'static str = "0x00000000000000000000000000000000000000dd";

    #[must_use]
    pub fn address_param(hash: &str) -> Value {
        json!({"hash": hash, "name": null, "is_contract": false, "is_verified": null})
    }

    #[must_use]
    pub fn account() -> Value {
        json!({
            "hash": Self::ADDRESS,
            "coin_balance": "1500000000000000000",
            "is_contract": false,
            "is_verified": false,
            "block_number_balance_updated_at": 1_234_567,
            "name": null,
            "creator_address_hash": null,
            "creation_tx_hash": null
        })
    }

    #[must_use]
    pub fn transaction(hash: &str, timestamp: &str) -> Value {
        json!({
            "hash": hash,
            "block_number": 1_000,
            "timestamp": timestamp,
            "from": Self::address_param(Self::ADDRESS),
            "to": Self::address_param(Self::OTHER),
            "value": "250000000000000000",
            "fee": {"type": "actual", "value": "21000000000000"},
            "status": "ok",
            "result": "success",
            "method": null,
            "transaction_types": ["coin_transfer"],
            "confirmations": 12,
            "gas_used": "21000",
            "gas_price": "1000000000",
            "nonce": 4
        })
    }

    #[must_use]
    pub fn internal_transaction(tx_hash: &str) -> Value {
        json!({
            "transaction_hash": tx_hash,
            "block_number": 900,
            "index": 1,
            "type": "call",
            "from": Self::address_param(Self::OTHER),
            "to": Self::address_param(Self::ADDRESS),
            "value": "10",
            "success": true,
            "timestamp": "2024-01-02T00:00:00.000000Z"
        })
    }

    #[must_use]
    pub fn block(height: u64) -> Value {
        json!({
            "height": height,
            "hash": format!("0x{:064x}", height),
            "parent_hash": format!("0x{:064x}", height.saturating_sub(1)),
            "timestamp": "2024-03-01T12:00:00.000000Z",
            "transactions_count": 3,
            "miner": Self::address_param(Self::MINER),
            "gas_used": "500",
            "gas_limit": "1000",
            "size": 1_024,
            "base_fee_per_gas": "7"
        })
    }

    #[must_use]
    pub fn token(symbol: &str, decimals: &str) -> Value {
        json!({
            "address": Self::TOKEN,
            "name": format!("{symbol} Token"),
            "symbol": symbol,
            "decimals": decimals,
            "type": "ERC-20",
            "holders": "42",
            "exchange_rate": null
        })
    }

    #[must_use]
    pub fn token_balance(symbol: &str, decimals: &str, value: &str) -> Value {
        json!({
            "token": Self::token(symbol, decimals),
            "value": value,
            "token_id": null
        })
    }

    #[must_use]
    pub fn token_transfer(tx_hash: &str, timestamp: &str) -> Value {
        json!({
            "transaction_hash": tx_hash,
            "from": Self::address_param(Self::OTHER),
            "to": Self::address_param(Self::ADDRESS),
            "token": Self::token("WEDU", "18"),
            "total": {"decimals": "18", "value": "1000000000000000000"},
            "method": "transfer",
            "type": "token_transfer",
            "timestamp": timestamp,
            "block_number": 1_001
        })
    }

    #[must_use]
    pub fn coin_balance_change(block_number: u64, timestamp: &str) -> Value {
        json!({
            "block_number": block_number,
            "value": "1500000000000000000",
            "delta": "-21000000000000",
            "transaction_hash": null,
            "block_timestamp": timestamp
        })
    }

    #[must_use]
    pub fn stats() -> Value {
        json!({
            "total_blocks": "1234567",
            "total_addresses": "8910",
            "total_transactions": "1112131",
            "average_block_time": 2500.0,
            "coin_price": "0.61234",
            "network_utilization_percentage": 12.3456,
            "transactions_today": "345",
            "gas_prices": {"slow": 0.01, "average": 0.02, "fast": 0.03}
        })
    }

    /// A list page with an optional `next_page_params`.
    #[must_use]
    pub fn page(items: Vec<Value>, next: Option<Value>) -> Value {
        json!({
            "items": items,
            "next_page_params": next.unwrap_or(Value::Null)
        })
    }

    #[must_use]
    pub fn cursor(block_number: u64, index: u64) -> Value {
        json!({"block_number": block_number, "index": index})
    }

    /// `count` timestamped placeholder items.
    #[must_use]
    pub fn items(prefix: &str, count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| Self::transaction(&format!("{prefix}-{i}"), "2024-03-01T12:00:00.000000Z"))
            .collect()
    }
}

// ============================================================================
// Scripted JSON Source
// ============================================================================

/// A request as seen by [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first query parameter named `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays canned responses per path, in order, and records requests.
///
/// A path with no response left answers with a 404.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, ExplorerError>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful body for `path`.
    #[must_use]
    pub fn respond(self, path: &str, body: Value) -> Self {
        self.push(path, Ok(body));
        self
    }

    /// Queue a failure for `path`.
    #[must_use]
    pub fn fail(self, path: &str, err: ExplorerError) -> Self {
        self.push(path, Err(err));
        self
    }

    /// Queue a non-success status for `path`.
    #[must_use]
    pub fn status(self, path: &str, status: u16) -> Self {
        let url = format!("http://scripted{path}");
        self.fail(path, ExplorerError::HttpStatus { status, url })
    }

    fn push(&self, path: &str, response: Result<Value, ExplorerError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl JsonSource for ScriptedSource {
    fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ExplorerError>> + Send {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            query: query.to_vec(),
        });
        let response = self
            .responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(ExplorerError::HttpStatus {
                    status: 404,
                    url: format!("http://scripted{path}"),
                })
            });
        std::future::ready(response)
    }
}

/// A source whose requests never complete.
#[derive(Debug, Default)]
pub struct StalledSource {
    requests: Mutex<usize>,
}

impl StalledSource {
    #[must_use]
    pub fn request_count(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

impl JsonSource for StalledSource {
    fn get_json(
        &self,
        _path: &str,
        _query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ExplorerError>> + Send {
        *self.requests.lock().unwrap() += 1;
        std::future::pending()
    }
}
