//! Plain-text rendering of explorer data.
//!
//! This module contains the formatting used by the command-line views:
//! - Hash shortening and thousands separators
//! - Exact scaling of integer token amounts (wei, token units)
//! - Relative ages ("3m ago") and absolute timestamps
//! - Renderers for accounts, blocks, transactions, stats and search hits
//!
//! Renderers take `now` explicitly so the output is reproducible.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::client::AccountOverview;
use crate::constants::{AMOUNT_FRACTION_DIGITS, NATIVE_DECIMALS};
use crate::domain::{
    Account, AddressParam, Block, CoinBalanceChange, GasPrice, InternalTransaction, NetworkStats,
    SearchHit, TokenBalance, TokenTransfer, Transaction,
};
use crate::pagination::AggregateResult;

/// Width of the label column in key/value views.
const LABEL_WIDTH: usize = 18;

/// Width of a shortened hash.
const HASH_WIDTH: usize = 13;

// ============================================================================
// Hashes and Numbers
// ============================================================================

/// Shorten a hex hash to `0x1234...abcd`.
///
/// Short or non-ASCII strings are returned unchanged.
#[must_use]
pub fn shorten_hash(hash: &str) -> String {
    if hash.len() <= HASH_WIDTH || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
}

/// Insert thousands separators into a string of digits.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a decimal counter string with separators, `-` when absent.
#[must_use]
pub fn format_count(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
            match raw.trim_start_matches('0') {
                "" => "0".to_string(),
                digits => group_digits(digits),
            }
        }
        Some(raw) => raw.to_string(),
        None => "-".to_string(),
    }
}

/// Scale an integer amount by `10^decimals` without going through floats.
///
/// The fraction is truncated to six digits and trailing zeros are dropped.
/// Returns `None` if `raw` is not an optionally negative integer.
#[must_use]
pub fn format_units(raw: &str, decimals: u32) -> Option<String> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let decimals = decimals as usize;
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac = frac_part[..frac_part.len().min(AMOUNT_FRACTION_DIGITS)].trim_end_matches('0');

    let mut out = String::new();
    if negative && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    Some(out)
}

/// Format a raw amount with its symbol.
///
/// Unparseable amounts are shown verbatim, missing ones as `-`.
#[must_use]
pub fn format_amount(raw: Option<&str>, decimals: u32, symbol: &str) -> String {
    match raw {
        Some(raw) => match format_units(raw, decimals) {
            Some(scaled) => format!("{scaled} {symbol}"),
            None => raw.to_string(),
        },
        None => "-".to_string(),
    }
}

/// Format a wei amount in the native coin.
#[must_use]
pub fn format_wei(raw: Option<&str>, symbol: &str) -> String {
    format_amount(raw, NATIVE_DECIMALS, symbol)
}

// ============================================================================
// Time
// ============================================================================

/// Relative age such as `45s ago`, `3m ago`, `2h ago` or `4 days ago`.
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 0 => "just now".to_string(),
        s if s < 60 => format!("{s}s ago"),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 2 * 86_400 => "1 day ago".to_string(),
        s => format!("{} days ago", s / 86_400),
    }
}

/// Absolute UTC timestamp, `-` when unknown.
#[must_use]
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "-".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn age(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    timestamp.map_or_else(|| "-".to_string(), |t| time_ago(t, now))
}

// ============================================================================
// Building Blocks
// ============================================================================

fn address_label(param: Option<&AddressParam>) -> String {
    match param {
        Some(param) if param.name.is_some() => param.label().to_string(),
        Some(param) => shorten_hash(&param.hash),
        None => "-".to_string(),
    }
}

fn field(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let label = format!("{label}:");
    let _ = writeln!(out, "{label:<LABEL_WIDTH$}{value}");
}

fn list_footer<T>(out: &mut String, result: &AggregateResult<T>, shown: usize) {
    if result.is_empty() {
        out.push_str("No items\n");
    }
    if result.len() > shown {
        let _ = writeln!(out, "... {} more", result.len() - shown);
    }
    if let (Some(earliest), Some(latest)) = (result.earliest, result.latest) {
        let _ = writeln!(
            out,
            "Spanning {} to {}",
            format_timestamp(Some(earliest)),
            format_timestamp(Some(latest))
        );
    }
    let pages = if result.pages_fetched == 1 { "page" } else { "pages" };
    let _ = write!(
        out,
        "{} items from {} {pages}",
        result.len(),
        result.pages_fetched
    );
    if !result.is_complete() {
        out.push_str(" (page limit reached, more available)");
    }
    out.push('\n');
}

// ============================================================================
// Account
// ============================================================================

/// Summary fields of an address.
#[must_use]
pub fn render_account(account: &Account, symbol: &str) -> String {
    let mut out = String::new();
    field(&mut out, "Address", &account.hash);
    field(&mut out, "Type", account.kind());
    if let Some(name) = &account.name {
        field(&mut out, "Name", name);
    }
    field(
        &mut out,
        "Balance",
        format_wei(account.coin_balance.as_deref(), symbol),
    );
    if let Some(block) = account.block_number_balance_updated_at {
        field(&mut out, "Updated at block", group_digits(&block.to_string()));
    }
    if let Some(creator) = &account.creator_address_hash {
        field(&mut out, "Creator", creator);
    }
    if let Some(tx) = &account.creation_tx_hash {
        field(&mut out, "Creation tx", tx);
    }
    out
}

/// Account page: summary, first activity and the three list tabs.
#[must_use]
pub fn render_account_overview(
    overview: &AccountOverview,
    symbol: &str,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let mut out = render_account(&overview.account, symbol);
    let first = match overview.first_transaction_at {
        Some(t) => format!("{} ({})", format_timestamp(Some(t)), time_ago(t, now)),
        None => "-".to_string(),
    };
    field(&mut out, "First activity", first);

    let address = overview.account.hash.as_str();
    out.push_str("\nTransactions\n");
    out.push_str(&render_transactions(
        &overview.transactions,
        Some(address),
        symbol,
        now,
        rows,
    ));
    out.push_str("\nTokens\n");
    out.push_str(&render_token_balances(&overview.tokens, rows));
    out.push_str("\nToken transfers\n");
    out.push_str(&render_token_transfers(
        &overview.token_transfers,
        Some(address),
        now,
        rows,
    ));
    out
}

// ============================================================================
// Transactions
// ============================================================================

fn transaction_row(tx: &Transaction, perspective: Option<&str>, symbol: &str, now: DateTime<Utc>) -> String {
    let block = tx
        .block_number()
        .map_or_else(|| "pending".to_string(), |b| b.to_string());
    let to = match (&tx.to, &tx.created_contract) {
        (None, Some(_)) => "new contract".to_string(),
        (to, _) => address_label(to.as_ref()),
    };
    let mut row = format!(
        "{:<HASH_WIDTH$}  {block:>9}  {:>11}  ",
        shorten_hash(&tx.hash),
        age(tx.timestamp, now)
    );
    if let Some(address) = perspective {
        let _ = write!(row, "{:<4}  ", tx.direction(address).as_str());
    }
    let _ = write!(
        row,
        "{:<HASH_WIDTH$}  {to:<HASH_WIDTH$}  {}",
        address_label(tx.from.as_ref()),
        format_wei(tx.value.as_deref(), symbol)
    );
    if !tx.is_pending() && !tx.succeeded() {
        row.push_str(" [failed]");
    }
    row
}

/// One line per transaction. `perspective` adds an IN/OUT column.
#[must_use]
pub fn render_transactions(
    result: &AggregateResult<Transaction>,
    perspective: Option<&str>,
    symbol: &str,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let mut out = String::new();
    for tx in result.items.iter().take(rows) {
        out.push_str(&transaction_row(tx, perspective, symbol, now));
        out.push('\n');
    }
    list_footer(&mut out, result, rows.min(result.len()));
    out
}

/// The front-page transaction list.
#[must_use]
pub fn render_latest_transactions(txs: &[Transaction], symbol: &str, now: DateTime<Utc>) -> String {
    txs.iter()
        .map(|tx| transaction_row(tx, None, symbol, now) + "\n")
        .collect()
}

/// Full detail of one transaction.
#[must_use]
pub fn render_transaction(tx: &Transaction, symbol: &str, now: DateTime<Utc>) -> String {
    let status = match (tx.is_pending(), tx.succeeded()) {
        (true, _) => "pending",
        (false, true) => "success",
        (false, false) => "failed",
    };

    let mut out = String::new();
    field(&mut out, "Hash", &tx.hash);
    field(&mut out, "Status", status);
    if let Some(reason) = tx.result.as_deref().filter(|_| status == "failed") {
        field(&mut out, "Reason", reason);
    }
    field(
        &mut out,
        "Block",
        tx.block_number()
            .map_or_else(|| "pending".to_string(), |b| b.to_string()),
    );
    let when = match tx.timestamp {
        Some(t) => format!("{} ({})", format_timestamp(Some(t)), time_ago(t, now)),
        None => "-".to_string(),
    };
    field(&mut out, "Timestamp", when);
    field(
        &mut out,
        "From",
        tx.from.as_ref().map_or("-", |p| p.hash.as_str()),
    );
    match (&tx.to, &tx.created_contract) {
        (None, Some(created)) => field(&mut out, "Created", &created.hash),
        (to, _) => field(&mut out, "To", to.as_ref().map_or("-", |p| p.hash.as_str())),
    }
    field(&mut out, "Value", format_wei(tx.value.as_deref(), symbol));
    field(
        &mut out,
        "Fee",
        format_wei(tx.fee.as_ref().map(|f| f.value.as_str()), symbol),
    );
    field(&mut out, "Gas used", format_count(tx.gas_used.as_deref()));
    field(
        &mut out,
        "Gas price",
        format_amount(tx.gas_price.as_deref(), 9, "gwei"),
    );
    if let Some(nonce) = tx.nonce {
        field(&mut out, "Nonce", nonce);
    }
    if let Some(method) = &tx.method {
        field(&mut out, "Method", method);
    }
    if !tx.transaction_types().is_empty() {
        field(&mut out, "Types", tx.transaction_types().join(", "));
    }
    if let Some(confirmations) = tx.confirmations {
        field(&mut out, "Confirmations", confirmations);
    }
    out
}

/// Value-carrying calls made by contracts on behalf of a transaction.
#[must_use]
pub fn render_internal_transactions(
    result: &AggregateResult<InternalTransaction>,
    symbol: &str,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let mut out = String::new();
    for itx in result.items.iter().take(rows) {
        let kind = itx.kind.as_deref().unwrap_or("call");
        let _ = write!(
            out,
            "{:<HASH_WIDTH$}  {:>11}  {kind:<12}  {:<HASH_WIDTH$}  {:<HASH_WIDTH$}  {}",
            shorten_hash(itx.tx_hash().unwrap_or("-")),
            age(itx.timestamp, now),
            address_label(itx.from.as_ref()),
            address_label(itx.to.as_ref()),
            format_wei(itx.value.as_deref(), symbol)
        );
        if itx.success == Some(false) {
            out.push_str(" [failed]");
        }
        out.push('\n');
    }
    list_footer(&mut out, result, rows.min(result.len()));
    out
}

/// Native balance after each change.
#[must_use]
pub fn render_balance_history(
    result: &AggregateResult<CoinBalanceChange>,
    symbol: &str,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let mut out = String::new();
    for change in result.items.iter().take(rows) {
        let _ = write!(
            out,
            "{:>9}  {:>11}  {}",
            change.block_number,
            age(change.block_timestamp, now),
            format_wei(Some(&change.value), symbol)
        );
        if let Some(delta) = change.delta.as_deref().and_then(|d| format_units(d, NATIVE_DECIMALS)) {
            let sign = if delta.starts_with('-') { "" } else { "+" };
            let _ = write!(out, "  ({sign}{delta})");
        }
        if let Some(tx) = change.transaction_hash() {
            let _ = write!(out, "  tx {}", shorten_hash(tx));
        }
        out.push('\n');
    }
    list_footer(&mut out, result, rows.min(result.len()));
    out
}

// ============================================================================
// Tokens
// ============================================================================

/// Token holdings with amounts scaled by each token's decimals.
#[must_use]
pub fn render_token_balances(result: &AggregateResult<TokenBalance>, rows: usize) -> String {
    let mut out = String::new();
    for balance in result.items.iter().take(rows) {
        let token = &balance.token;
        let amount = match &balance.token_id {
            Some(id) => format!("#{id}"),
            None => balance
                .value
                .as_deref()
                .and_then(|v| format_units(v, token.decimals()))
                .unwrap_or_else(|| "-".to_string()),
        };
        let _ = writeln!(
            out,
            "{:<12}  {amount:>24}  {}",
            token.display_symbol(),
            token.token_type.as_deref().unwrap_or("-")
        );
    }
    list_footer(&mut out, result, rows.min(result.len()));
    out
}

/// Token transfers with direction relative to `perspective`.
#[must_use]
pub fn render_token_transfers(
    result: &AggregateResult<TokenTransfer>,
    perspective: Option<&str>,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let mut out = String::new();
    for transfer in result.items.iter().take(rows) {
        let symbol = transfer.token.display_symbol();
        let amount = match (transfer.token_id(), transfer.amount()) {
            (Some(id), _) => format!("#{id} {symbol}"),
            (None, raw) => format_amount(raw, transfer.token.decimals(), &symbol),
        };
        let _ = write!(
            out,
            "{:<HASH_WIDTH$}  {:>11}  ",
            shorten_hash(transfer.transaction_hash().unwrap_or("-")),
            age(transfer.timestamp, now)
        );
        if let Some(address) = perspective {
            let _ = write!(out, "{:<4}  ", transfer.direction(address).as_str());
        }
        let _ = writeln!(
            out,
            "{:<HASH_WIDTH$}  {:<HASH_WIDTH$}  {amount}",
            address_label(Some(&transfer.from)),
            address_label(Some(&transfer.to))
        );
    }
    list_footer(&mut out, result, rows.min(result.len()));
    out
}

// ============================================================================
// Blocks
// ============================================================================

fn block_row(block: &Block, now: DateTime<Utc>) -> String {
    let gas = block
        .gas_utilization()
        .map_or_else(|| "-".to_string(), |g| format!("{g:.1}%"));
    format!(
        "{:>9}  {:>11}  {:>4} txs  gas {gas:>6}  miner {}",
        block.height,
        age(block.timestamp, now),
        block.transactions_count(),
        address_label(block.miner.as_ref())
    )
}

/// One line per block.
#[must_use]
pub fn render_blocks(blocks: &[Block], now: DateTime<Utc>) -> String {
    blocks.iter().map(|b| block_row(b, now) + "\n").collect()
}

/// Aggregated block listing with its footer.
#[must_use]
pub fn render_block_list(result: &AggregateResult<Block>, now: DateTime<Utc>, rows: usize) -> String {
    let shown = rows.min(result.len());
    let mut out = render_blocks(&result.items[..shown], now);
    list_footer(&mut out, result, shown);
    out
}

/// Full detail of one block.
#[must_use]
pub fn render_block(block: &Block, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    field(&mut out, "Height", block.height);
    field(&mut out, "Hash", block.hash.as_deref().unwrap_or("-"));
    field(&mut out, "Parent", block.parent_hash.as_deref().unwrap_or("-"));
    let when = match block.timestamp {
        Some(t) => format!("{} ({})", format_timestamp(Some(t)), time_ago(t, now)),
        None => "-".to_string(),
    };
    field(&mut out, "Timestamp", when);
    field(&mut out, "Transactions", block.transactions_count());
    field(
        &mut out,
        "Miner",
        block.miner.as_ref().map_or("-", |m| m.hash.as_str()),
    );
    let gas = match block.gas_utilization() {
        Some(pct) => format!(
            "{} / {} ({pct:.1}%)",
            format_count(block.gas_used.as_deref()),
            format_count(block.gas_limit.as_deref())
        ),
        None => format_count(block.gas_used.as_deref()),
    };
    field(&mut out, "Gas used", gas);
    if let Some(size) = block.size {
        field(&mut out, "Size", format!("{} bytes", group_digits(&size.to_string())));
    }
    if let Some(base_fee) = block.base_fee_per_gas.as_deref() {
        field(&mut out, "Base fee", format_amount(Some(base_fee), 9, "gwei"));
    }
    out
}

// ============================================================================
// Stats and Search
// ============================================================================

/// Front-page statistics.
#[must_use]
pub fn render_stats(stats: &NetworkStats, network: &str, symbol: &str) -> String {
    let mut out = String::new();
    field(&mut out, "Network", network);
    field(&mut out, "Total blocks", format_count(stats.total_blocks.as_deref()));
    field(
        &mut out,
        "Total addresses",
        format_count(stats.total_addresses.as_deref()),
    );
    field(
        &mut out,
        "Transactions",
        format_count(stats.total_transactions.as_deref()),
    );
    field(
        &mut out,
        "Txns today",
        format_count(stats.transactions_today.as_deref()),
    );
    if let Some(secs) = stats.average_block_time_secs() {
        field(&mut out, "Avg block time", format!("{secs:.1}s"));
    }
    field(
        &mut out,
        &format!("{symbol} price"),
        format!("${:.4}", stats.coin_price_usd()),
    );
    if let Some(pct) = stats.network_utilization_percentage {
        field(&mut out, "Utilization", format!("{pct:.2}%"));
    }
    if let Some(avg) = stats
        .gas_prices
        .as_ref()
        .and_then(|g| g.average.as_ref())
        .and_then(GasPrice::price)
    {
        field(&mut out, "Gas (avg)", format!("{avg} gwei"));
    }
    out
}

/// One line per search hit.
#[must_use]
pub fn render_search(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results\n".to_string();
    }
    let mut out = String::new();
    for hit in hits {
        let detail = match hit {
            SearchHit::Address { hash, name } | SearchHit::Contract { hash, name } => {
                format!("{hash}  {}", name.as_deref().unwrap_or(""))
            }
            SearchHit::Transaction { hash } => hash.clone(),
            SearchHit::Block { hash, height } => match height {
                Some(h) => format!("{h}  {hash}"),
                None => hash.clone(),
            },
            SearchHit::Token {
                address,
                name,
                symbol,
            } => format!(
                "{address}  {} ({})",
                name.as_deref().unwrap_or("-"),
                symbol.as_deref().unwrap_or("-")
            ),
            SearchHit::Other { label, .. } => label.clone().unwrap_or_default(),
        };
        let _ = writeln!(out, "{:<12}{}", hit.kind(), detail.trim_end());
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
