//! Application configuration with persistence.
//!
//! This module provides the [`AppConfig`] structure for managing explorer
//! settings with load/save to disk.
//!
//! # Configuration File Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/eduscan/config.json`
//! - macOS: `~/Library/Application Support/eduscan/config.json`
//! - Windows: `%APPDATA%/eduscan/config.json`
//!
//! # Example
//!
//! ```ignore
//! use crate::state::AppConfig;
//!
//! let mut config = AppConfig::load();
//! config.max_pages = 10;
//! config.save()?;
//! ```

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{HttpConfig, RetryPolicy};
use crate::client::http::DEFAULT_TIMEOUT_SECS;
use crate::constants::{
    DEFAULT_BLOCKS_REFRESH_SECS, DEFAULT_MAX_PAGES, DEFAULT_STATS_REFRESH_SECS,
    DEFAULT_TRANSACTIONS_REFRESH_SECS,
};
use crate::domain::{CustomNetwork, Network, NetworkConfig};
use crate::pagination::FetchPolicy;

// ============================================================================
// Constants
// ============================================================================

/// Application name used for configuration directory.
const APP_NAME: &str = "eduscan";

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

// ============================================================================
// Refresh Intervals
// ============================================================================

/// How often each live view refreshes, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshIntervals {
    pub blocks_secs: u64,
    pub transactions_secs: u64,
    pub stats_secs: u64,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            blocks_secs: DEFAULT_BLOCKS_REFRESH_SECS,
            transactions_secs: DEFAULT_TRANSACTIONS_REFRESH_SECS,
            stats_secs: DEFAULT_STATS_REFRESH_SECS,
        }
    }
}

// ============================================================================
// AppConfig
// ============================================================================

/// Persistent explorer settings.
///
/// Missing fields fall back to their defaults, so older or hand-written
/// files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// The currently selected network.
    pub network: NetworkConfig,
    /// User-defined Blockscout instances.
    pub custom_networks: Vec<CustomNetwork>,
    /// Ceiling on pages fetched per list.
    pub max_pages: usize,
    /// Requested page size; the server default when unset.
    pub page_size: Option<u32>,
    pub request_timeout_secs: u64,
    /// Retries for transient failures. Zero fails on the first error.
    pub max_retries: u32,
    pub refresh: RefreshIntervals,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::BuiltIn(Network::default()),
            custom_networks: Vec::new(),
            max_pages: DEFAULT_MAX_PAGES,
            page_size: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
            refresh: RefreshIntervals::default(),
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined
    /// or created.
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "Could not determine config directory. Expected XDG_CONFIG_HOME or ~/.config on Linux, ~/Library/Application Support on macOS, %APPDATA% on Windows"
            )
        })?;
        path.push(APP_NAME);
        fs::create_dir_all(&path)?;
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Loads the configuration from disk, or the defaults if that fails.
    #[must_use]
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Config load failed, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Attempts to load the configuration from disk.
    ///
    /// A missing file is not an error and yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates a configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined or the file cannot
    /// be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration as pretty JSON at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.fetch_policy().validate()?;
        if self.request_timeout_secs == 0 {
            return Err(color_eyre::eyre::eyre!(
                "request_timeout_secs must be greater than zero"
            ));
        }
        let refresh = self.refresh;
        if refresh.blocks_secs == 0 || refresh.transactions_secs == 0 || refresh.stats_secs == 0 {
            return Err(color_eyre::eyre::eyre!(
                "refresh intervals must be greater than zero"
            ));
        }
        Ok(())
    }

    /// Pagination limits for list requests.
    #[must_use]
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            page_size: self.page_size,
            ..FetchPolicy::with_max_pages(self.max_pages)
        }
    }

    /// Transport settings for the HTTP client.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_retry(RetryPolicy::exponential(self.max_retries))
    }

    /// Adds a custom network, or replaces the URL of the one with the same
    /// name. Names compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the name belongs to a built-in network.
    pub fn upsert_custom_network(&mut self, network: CustomNetwork) -> Result<()> {
        if Network::from_name(&network.name).is_some() {
            return Err(color_eyre::eyre::eyre!(
                "Network '{}' is built in and cannot be redefined",
                network.name
            ));
        }

        if let NetworkConfig::Custom(ref mut current) = self.network
            && same_name(&current.name, &network.name)
        {
            *current = network.clone();
        }
        match self
            .custom_networks
            .iter_mut()
            .find(|n| same_name(&n.name, &network.name))
        {
            Some(existing) => *existing = network,
            None => self.custom_networks.push(network),
        }
        Ok(())
    }

    /// Deletes a custom network by name.
    ///
    /// Falls back to the default network if the deleted one was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the network is not found.
    pub fn delete_custom_network(&mut self, name: &str) -> Result<()> {
        let original_len = self.custom_networks.len();
        self.custom_networks.retain(|n| !same_name(&n.name, name));

        if self.custom_networks.len() == original_len {
            return Err(color_eyre::eyre::eyre!("Network '{}' not found", name));
        }

        if let NetworkConfig::Custom(ref current) = self.network
            && same_name(&current.name, name)
        {
            self.network = NetworkConfig::default();
        }
        Ok(())
    }

    /// Resolve a network by name among built-in and custom networks.
    #[must_use]
    pub fn find_network(&self, name: &str) -> Option<NetworkConfig> {
        Network::from_name(name).map(NetworkConfig::BuiltIn).or_else(|| {
            self.custom_networks
                .iter()
                .find(|n| same_name(&n.name, name))
                .cloned()
                .map(NetworkConfig::Custom)
        })
    }

    /// All built-in networks followed by custom ones.
    #[must_use]
    pub fn all_networks(&self) -> Vec<NetworkConfig> {
        Network::ALL
            .iter()
            .copied()
            .map(NetworkConfig::BuiltIn)
            .chain(self.custom_networks.iter().cloned().map(NetworkConfig::Custom))
            .collect()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

// ============================================================================
// Tests
// ============================================================================
