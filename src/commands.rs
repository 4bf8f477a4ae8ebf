//! Command execution for the eduscan binary.
//!
//! One-shot queries render to a string that `run` prints; `watch` drives a
//! [`Poller`] until Ctrl-C. Ctrl-C during a one-shot query cancels any
//! in-flight aggregation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::{BlockscoutClient, HttpSource, JsonSource};
use crate::constants::{DEFAULT_LIST_ROWS, POLL_CHANNEL_CAPACITY};
use crate::domain::{CustomNetwork, ExplorerError, NetworkConfig, Route};
use crate::pagination::FetchPolicy;
use crate::poller::{PollUpdate, Poller};
use crate::render;
use crate::state::{AppConfig, RefreshIntervals};
use crate::{
    AccountTab, Cli, Commands, ConfigAction, GlobalArgs, VERSION, WatchTarget, transaction_query,
};

// ============================================================================
// Entry Point
// ============================================================================

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns configuration, validation and request errors for display by
/// `color_eyre`.
pub async fn run(cli: Cli) -> Result<()> {
    let Cli { global, command } = cli;

    match command {
        Commands::Version => {
            println!("eduscan v{VERSION}");
            println!("A command-line explorer for EDU Chain Blockscout instances");
            Ok(())
        }
        Commands::Config { action } => configure(action),
        Commands::Watch { target, interval } => {
            let config = apply_overrides(AppConfig::load(), &global)?;
            Explorer::connect(&config)?.watch(target, interval).await
        }
        command => {
            let config = apply_overrides(AppConfig::load(), &global)?;
            let explorer = Explorer::connect(&config)?;

            let output = tokio::select! {
                output = explorer.execute(command) => output?,
                _ = tokio::signal::ctrl_c() => {
                    explorer.cancel.cancel();
                    return Err(ExplorerError::Cancelled.into());
                }
            };
            print!("{output}");
            Ok(())
        }
    }
}

/// Layer command-line flags over the saved configuration.
fn apply_overrides(mut config: AppConfig, args: &GlobalArgs) -> Result<AppConfig> {
    match (&args.api_url, &args.network) {
        (Some(url), name) => {
            let name = name.as_deref().unwrap_or("custom");
            config.network = NetworkConfig::Custom(CustomNetwork::new(name, url.as_str()));
        }
        (None, Some(name)) => {
            config.network = config.find_network(name).ok_or_else(|| {
                eyre!("Unknown network '{name}'. Run `eduscan config show` to list networks.")
            })?;
        }
        (None, None) => {}
    }

    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = Some(page_size);
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(retries) = args.retries {
        config.max_retries = retries;
    }

    config.validate()?;
    Ok(config)
}

// ============================================================================
// Config Subcommands
// ============================================================================

fn configure(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::try_load()?;
            println!("# {}", AppConfig::config_path()?.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!("\nNetworks:");
            for network in config.all_networks() {
                let marker = if network == config.network { "*" } else { " " };
                println!("{marker} {:<20} {}", network.name(), network.api_url());
            }
        }
        ConfigAction::SetNetwork { name, api_url } => {
            let mut config = AppConfig::try_load()?;
            select_network(&mut config, &name, api_url)?;
            config.save()?;
            println!(
                "Network set to {} ({})",
                config.network.name(),
                config.network.api_url()
            );
        }
        ConfigAction::RemoveNetwork { name } => {
            let mut config = AppConfig::try_load()?;
            config.delete_custom_network(&name)?;
            config.save()?;
            println!("Removed network '{name}'");
        }
        ConfigAction::Reset => {
            AppConfig::default().save()?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}

fn select_network(config: &mut AppConfig, name: &str, api_url: Option<String>) -> Result<()> {
    if let Some(url) = api_url {
        config.upsert_custom_network(CustomNetwork::new(name, url))?;
    }
    config.network = config
        .find_network(name)
        .ok_or_else(|| eyre!("Unknown network '{name}'. Pass --api-url to add it."))?;
    Ok(())
}

// ============================================================================
// Explorer
// ============================================================================

/// A client plus the limits every query runs under.
struct Explorer<S = HttpSource> {
    client: BlockscoutClient<S>,
    policy: FetchPolicy,
    refresh: RefreshIntervals,
    rows: usize,
    cancel: CancellationToken,
}

impl Explorer<HttpSource> {
    fn connect(config: &AppConfig) -> Result<Self> {
        let client = BlockscoutClient::new(config.network.clone(), config.http_config())?;
        tracing::debug!(
            "Using {} at {}",
            config.network.name(),
            config.network.api_url()
        );
        Ok(Self::with_client(client, config))
    }

    /// Refresh one front-page view until Ctrl-C.
    async fn watch(self, target: WatchTarget, interval: Option<u64>) -> Result<()> {
        let secs = interval.unwrap_or(match target {
            WatchTarget::Stats => self.refresh.stats_secs,
            WatchTarget::Blocks => self.refresh.blocks_secs,
            WatchTarget::Txs => self.refresh.transactions_secs,
        });
        let period = Duration::from_secs(secs);
        let network = self.client.network().name().to_string();
        let symbol = self.client.network().coin_symbol();
        let client = Arc::new(self.client);

        match target {
            WatchTarget::Stats => {
                let (sender, updates) = mpsc::channel(POLL_CHANNEL_CAPACITY);
                let poller = Poller::start("stats", period, sender, move |_| {
                    let client = Arc::clone(&client);
                    async move { client.stats().await }
                })
                .map_err(ExplorerError::into_report)?;
                follow(poller, updates, |stats| {
                    render::render_stats(stats, &network, symbol)
                })
                .await
            }
            WatchTarget::Blocks => {
                let (sender, updates) = mpsc::channel(POLL_CHANNEL_CAPACITY);
                let poller = Poller::start("blocks", period, sender, move |_| {
                    let client = Arc::clone(&client);
                    async move { client.latest_blocks().await }
                })
                .map_err(ExplorerError::into_report)?;
                follow(poller, updates, |blocks| {
                    render::render_blocks(blocks, Utc::now())
                })
                .await
            }
            WatchTarget::Txs => {
                let (sender, updates) = mpsc::channel(POLL_CHANNEL_CAPACITY);
                let poller = Poller::start("transactions", period, sender, move |_| {
                    let client = Arc::clone(&client);
                    async move { client.latest_transactions().await }
                })
                .map_err(ExplorerError::into_report)?;
                follow(poller, updates, |txs| {
                    render::render_latest_transactions(txs, symbol, Utc::now())
                })
                .await
            }
        }
    }
}

impl<S: JsonSource + Sync> Explorer<S> {
    fn with_client(client: BlockscoutClient<S>, config: &AppConfig) -> Self {
        Self {
            client,
            policy: config.fetch_policy(),
            refresh: config.refresh,
            rows: DEFAULT_LIST_ROWS,
            cancel: CancellationToken::new(),
        }
    }

    /// Run a one-shot query and render its result.
    async fn execute(&self, command: Commands) -> Result<String> {
        let client = &self.client;
        let (policy, cancel) = (&self.policy, &self.cancel);
        let symbol = client.network().coin_symbol();
        let now = Utc::now();

        let output = match command {
            Commands::Account { address, tab } => self.account(&address, tab).await?,
            Commands::Block { id } => render::render_block(&client.get_block(&id).await?, now),
            Commands::Blocks { kind } => {
                let blocks = client.list_blocks(kind.into(), policy, cancel).await?;
                render::render_block_list(&blocks, now, self.rows)
            }
            Commands::LatestBlocks => render::render_blocks(&client.latest_blocks().await?, now),
            Commands::Tx { hash } => {
                render::render_transaction(&client.get_transaction(&hash).await?, symbol, now)
            }
            Commands::Txs {
                pending,
                types,
                methods,
            } => {
                let query = transaction_query(pending, &types, &methods);
                let txs = client.list_transactions(query, policy, cancel).await?;
                render::render_transactions(&txs, None, symbol, now, self.rows)
            }
            Commands::LatestTxs => {
                render::render_latest_transactions(&client.latest_transactions().await?, symbol, now)
            }
            Commands::Search { query, open: false } => {
                render::render_search(&client.search(&query).await?)
            }
            Commands::Search { query, open: true } => {
                let route = client.resolve(&query).await?;
                tracing::debug!("Search '{query}' resolved to {route:?}");
                match route {
                    Route::Account(address) => self.account(&address, None).await?,
                    Route::Transaction(hash) => {
                        render::render_transaction(&client.get_transaction(&hash).await?, symbol, now)
                    }
                    Route::Block(id) => render::render_block(&client.get_block(&id).await?, now),
                }
            }
            Commands::Stats => render::render_stats(
                &client.stats().await?,
                client.network().name(),
                symbol,
            ),
            Commands::Watch { .. } | Commands::Config { .. } | Commands::Version => {
                return Err(eyre!("not a one-shot query"));
            }
        };
        Ok(output)
    }

    async fn account(&self, address: &str, tab: Option<AccountTab>) -> Result<String> {
        let client = &self.client;
        let (policy, cancel, rows) = (&self.policy, &self.cancel, self.rows);
        let symbol = client.network().coin_symbol();
        let address = address.trim();
        let now = Utc::now();

        Ok(match tab {
            None => render::render_account_overview(
                &client.account_overview(address, policy, cancel).await?,
                symbol,
                now,
                rows,
            ),
            Some(AccountTab::Transactions) => render::render_transactions(
                &client.account_transactions(address, policy, cancel).await?,
                Some(address),
                symbol,
                now,
                rows,
            ),
            Some(AccountTab::Tokens) => render::render_token_balances(
                &client.account_tokens(address, policy, cancel).await?,
                rows,
            ),
            Some(AccountTab::Transfers) => render::render_token_transfers(
                &client.account_token_transfers(address, policy, cancel).await?,
                Some(address),
                now,
                rows,
            ),
            Some(AccountTab::Internal) => render::render_internal_transactions(
                &client
                    .account_internal_transactions(address, policy, cancel)
                    .await?,
                symbol,
                now,
                rows,
            ),
            Some(AccountTab::BalanceHistory) => render::render_balance_history(
                &client
                    .account_coin_balance_history(address, policy, cancel)
                    .await?,
                symbol,
                now,
                rows,
            ),
        })
    }
}

/// Print every poll outcome until Ctrl-C or the poller ends.
async fn follow<T>(
    poller: Poller,
    mut updates: mpsc::Receiver<PollUpdate<T>>,
    view: impl Fn(&T) -> String,
) -> Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            update = updates.recv() => match update {
                Some(PollUpdate { tick, result: Ok(value) }) => {
                    println!(
                        "--- {} #{tick} at {} ---",
                        poller.name(),
                        render::format_timestamp(Some(Utc::now()))
                    );
                    print!("{}", view(&value));
                }
                Some(PollUpdate { tick, result: Err(message) }) => {
                    eprintln!("{} #{tick} failed: {message}", poller.name());
                }
                None => {
                    if !poller.is_running() {
                        tracing::warn!("Poller '{}' ended unexpectedly", poller.name());
                    }
                    break;
                }
            },
        }
    }

    poller.stop().await;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
