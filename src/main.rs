use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod constants;
mod domain;
mod pagination;
mod poller;
mod render;
mod state;

#[cfg(test)]
mod test_utils;

use crate::domain::{BlockKind, TransactionFilter, TransactionQuery, TransactionType};

// eduscan version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// eduscan - Command-line explorer for EDU Chain Blockscout instances
#[derive(Debug, Parser)]
#[command(name = "eduscan", version = VERSION, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the saved configuration for one run.
#[derive(Debug, Clone, Default, Args)]
struct GlobalArgs {
    /// Network name (built-in or custom)
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Blockscout `/api/v2` base URL, overriding the network
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Maximum pages fetched per list
    #[arg(long, global = true)]
    max_pages: Option<usize>,

    /// Items requested per page
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Retries for transient failures (0 fails fast)
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Log requests and pagination at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show an address with its transactions, tokens and transfers
    Account {
        address: String,
        /// Show a single list instead of the overview
        #[arg(long, value_enum)]
        tab: Option<AccountTab>,
    },
    /// Show one block by height or hash
    Block { id: String },
    /// List blocks, newest first
    Blocks {
        #[arg(long, value_enum, default_value_t = BlockKindArg::Block)]
        kind: BlockKindArg,
    },
    /// Newest blocks from the front page
    LatestBlocks,
    /// Show one transaction by hash
    Tx { hash: String },
    /// List transactions, newest first
    Txs {
        /// List pending transactions instead of validated ones
        #[arg(long)]
        pending: bool,
        /// Only these transaction types (comma separated)
        #[arg(long = "type", value_enum, value_delimiter = ',')]
        types: Vec<TxTypeArg>,
        /// Only these contract methods, e.g. transfer,approve
        #[arg(long = "method", value_delimiter = ',')]
        methods: Vec<String>,
    },
    /// Newest transactions from the front page
    LatestTxs,
    /// Search addresses, transactions, blocks and tokens
    Search {
        query: String,
        /// Open the first navigable result instead of listing hits
        #[arg(long)]
        open: bool,
    },
    /// Network statistics
    Stats,
    /// Refresh a view periodically until Ctrl-C
    Watch {
        #[arg(value_enum)]
        target: WatchTarget,
        /// Refresh interval in seconds (defaults to the configured interval)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Manage the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Display version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AccountTab {
    Transactions,
    Tokens,
    Transfers,
    Internal,
    BalanceHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BlockKindArg {
    Block,
    Uncle,
    Reorg,
}

impl From<BlockKindArg> for BlockKind {
    fn from(kind: BlockKindArg) -> Self {
        match kind {
            BlockKindArg::Block => Self::Block,
            BlockKindArg::Uncle => Self::Uncle,
            BlockKindArg::Reorg => Self::Reorg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TxTypeArg {
    TokenTransfer,
    ContractCreation,
    ContractCall,
    CoinTransfer,
    TokenCreation,
}

impl From<TxTypeArg> for TransactionType {
    fn from(kind: TxTypeArg) -> Self {
        match kind {
            TxTypeArg::TokenTransfer => Self::TokenTransfer,
            TxTypeArg::ContractCreation => Self::ContractCreation,
            TxTypeArg::ContractCall => Self::ContractCall,
            TxTypeArg::CoinTransfer => Self::CoinTransfer,
            TxTypeArg::TokenCreation => Self::TokenCreation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WatchTarget {
    Stats,
    Blocks,
    Txs,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the configuration file and available networks
    Show,
    /// Select a network, registering it first when --api-url is given
    SetNetwork {
        name: String,
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
    /// Remove a custom network
    RemoveNetwork { name: String },
    /// Restore the defaults
    Reset,
}

fn transaction_query(pending: bool, types: &[TxTypeArg], methods: &[String]) -> TransactionQuery {
    TransactionQuery {
        filter: if pending {
            TransactionFilter::Pending
        } else {
            TransactionFilter::Validated
        },
        types: types.iter().copied().map(TransactionType::from).collect(),
        methods: methods
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect(),
    }
}

/// Install the stderr subscriber. `--verbose` wins over `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("eduscan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Application entry point
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    commands::run(cli).await
}

// ============================================================================
// Tests
// ============================================================================
