//! Persistent explorer state.
//!
//! - [`AppConfig`] - Network selection, fetch limits and refresh intervals

pub mod config;

pub use config::{AppConfig, RefreshIntervals};
