//! Network configuration for Blockscout explorer instances.
//!
//! This module defines the built-in EDU Chain explorers and user-defined
//! custom API endpoints.

use serde::{Deserialize, Serialize};

// ============================================================================
// Network Configuration
// ============================================================================

/// Built-in Blockscout instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    /// Open Campus Codex explorer.
    #[default]
    OpenCampusCodex,
    /// EDU Chain testnet explorer.
    EduChainTestnet,
}

impl Network {
    /// All built-in networks, in display order.
    pub const ALL: [Self; 2] = [Self::OpenCampusCodex, Self::EduChainTestnet];

    /// Returns the human-readable name of the network.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenCampusCodex => "OpenCampusCodex",
            Self::EduChainTestnet => "EduChainTestnet",
        }
    }

    /// Returns the `/api/v2` base URL for this network.
    #[must_use]
    pub const fn api_url(&self) -> &'static str {
        match self {
            Self::OpenCampusCodex => "https://opencampus-codex.blockscout.com/api/v2",
            Self::EduChainTestnet => "https://edu-chain-testnet.blockscout.com/api/v2",
        }
    }

    /// Symbol of the native coin.
    #[must_use]
    pub const fn coin_symbol(&self) -> &'static str {
        "EDU"
    }

    /// Parse a network from a case-insensitive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "opencampuscodex" | "codex" | "opencampus" => Some(Self::OpenCampusCodex),
            "educhaintestnet" | "testnet" | "edu-testnet" => Some(Self::EduChainTestnet),
            _ => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Custom Networks
// ============================================================================

/// A user-defined Blockscout instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomNetwork {
    /// Display name.
    pub name: String,
    /// Base URL ending in `/api/v2`.
    pub api_url: String,
}

impl CustomNetwork {
    /// Create a custom network, trimming any trailing slash from the URL.
    #[must_use]
    pub fn new(name: impl Into<String>, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            name: name.into(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Either a built-in network or a custom endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum NetworkConfig {
    BuiltIn(Network),
    Custom(CustomNetwork),
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::BuiltIn(Network::default())
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn(network) => network.as_str(),
            Self::Custom(custom) => &custom.name,
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        match self {
            Self::BuiltIn(network) => network.api_url(),
            Self::Custom(custom) => &custom.api_url,
        }
    }

    /// Symbol of the native coin; custom instances are assumed to be EDU chains.
    #[must_use]
    pub fn coin_symbol(&self) -> &'static str {
        match self {
            Self::BuiltIn(network) => network.coin_symbol(),
            Self::Custom(_) => "EDU",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
