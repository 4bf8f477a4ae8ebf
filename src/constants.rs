//! Application constants for eduscan.
//!
//! Defaults only; every value here can be overridden through the config file
//! or command-line flags.

use std::time::Duration;

// ============================================================================
// Pagination
// ============================================================================

/// Default ceiling on pages fetched by one aggregation.
pub const DEFAULT_MAX_PAGES: usize = 5;

// ============================================================================
// Refresh Intervals
// ============================================================================

/// Default refresh interval for the latest-blocks view (in seconds).
pub const DEFAULT_BLOCKS_REFRESH_SECS: u64 = 10;

/// Default refresh interval for the latest-transactions view (in seconds).
pub const DEFAULT_TRANSACTIONS_REFRESH_SECS: u64 = 10;

/// Default refresh interval for network statistics (in seconds).
pub const DEFAULT_STATS_REFRESH_SECS: u64 = 10;

/// Capacity of the channel between a poller and its consumer.
pub const POLL_CHANNEL_CAPACITY: usize = 16;

/// How long `stop` waits for a poller task to wind down.
pub const POLLER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Display
// ============================================================================

/// Decimals of the native coin (wei).
pub const NATIVE_DECIMALS: u32 = 18;

/// Fraction digits shown for amounts.
pub const AMOUNT_FRACTION_DIGITS: usize = 6;

/// Rows shown per list in the text renderer.
pub const DEFAULT_LIST_ROWS: usize = 25;
