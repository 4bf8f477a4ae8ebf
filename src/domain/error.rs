//! Error types for explorer API operations.
//!
//! Every failure the client or the pagination fetcher can surface is one of
//! these variants. An empty result is not an error: it is an aggregate with
//! no items.

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for Blockscout client operations.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The request never produced a response (unreachable host, TLS, timeout).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// The request URL, including the query string.
        url: String,
    },

    /// The body was not the JSON shape the endpoint promises.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Description of what failed to parse.
        message: String,
    },

    /// Entity not found on the network.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// The type of entity that was not found (e.g., "transaction", "block").
        entity: &'static str,
        /// The identifier that was searched for.
        id: String,
    },

    /// Invalid user input or fetch policy.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),

    /// The caller stopped caring before the work finished.
    #[error("Request cancelled")]
    Cancelled,
}

impl ExplorerError {
    /// Create a new malformed-response error with the given message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new not found error.
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity that was not found
    /// * `id` - The identifier that was searched for
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new client initialization error.
    #[must_use]
    pub fn client_init(message: impl Into<String>) -> Self {
        Self::ClientInit(message.into())
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures, `429 Too Many Requests` and server errors are
    /// transient. Everything else will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// Convert to a `color_eyre::Report` for the binary's top-level handling.
    #[must_use = "this converts the error into a Report for display"]
    pub fn into_report(self) -> color_eyre::Report {
        color_eyre::eyre::eyre!("{}", self)
    }
}

// ============================================================================
// Tests
// ============================================================================
