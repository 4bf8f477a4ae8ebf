//! HTTP client for Blockscout explorer APIs.
//!
//! This module provides:
//! - [`source`] - The `JsonSource` seam between request building and the network
//! - [`http`] - Pooled HTTP transport with timeout and retry policy
//! - [`blockscout`] - Typed operations over the Blockscout `/api/v2` endpoints
//!
//! # Example
//!
//! ```ignore
//! use crate::client::{BlockscoutClient, HttpConfig};
//!
//! let client = BlockscoutClient::new(NetworkConfig::default(), HttpConfig::default())?;
//! let stats = client.stats().await?;
//! ```

pub mod blockscout;
pub mod http;
pub mod source;

// ============================================================================
// Re-exports
// ============================================================================

pub use blockscout::{AccountOverview, BlockscoutClient};
pub use http::{HttpConfig, HttpSource, RetryPolicy};
pub use source::JsonSource;
