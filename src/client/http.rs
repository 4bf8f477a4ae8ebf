//! HTTP client abstraction for Blockscout API requests.
//!
//! Every request carries a per-request timeout; the external API is an
//! untrusted dependency with unbounded latency. Retries are opt-in.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use reqwest::Client;
use serde_json::Value;

use super::source::JsonSource;
use crate::domain::ExplorerError;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// First retry delay in milliseconds
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;

/// Upper bound for a single retry delay in milliseconds
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 8_000;

// ============================================================================
// Configuration
// ============================================================================

/// Retry behaviour for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure. Zero means fail fast.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// No retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }

    /// Exponential backoff with the default delays.
    #[must_use]
    pub const fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::none()
        }
    }

    /// Backoff schedule for one request, ending after `max_retries` delays.
    #[must_use]
    pub fn backoff(&self) -> BoundedBackoff {
        BoundedBackoff {
            inner: ExponentialBackoff {
                initial_interval: self.initial_backoff,
                max_interval: self.max_backoff,
                max_elapsed_time: None,
                ..ExponentialBackoff::default()
            },
            max_retries: self.max_retries,
            remaining: self.max_retries,
        }
    }
}

/// Exponential backoff capped by a retry count instead of elapsed time.
pub struct BoundedBackoff {
    inner: ExponentialBackoff,
    max_retries: u32,
    remaining: u32,
}

impl Backoff for BoundedBackoff {
    fn reset(&mut self) {
        self.inner.reset();
        self.remaining = self.max_retries;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.inner.next_backoff()
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::none(),
        }
    }
}

impl HttpConfig {
    /// Create config with custom timeout
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Base HTTP client wrapper
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a pooled client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ExplorerError::ClientInit` if the TLS backend is unavailable.
    pub fn with_config(config: HttpConfig) -> Result<Self, ExplorerError> {
        let inner = Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .user_agent(concat!("eduscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExplorerError::client_init(e.to_string()))?;
        Ok(Self { inner, config })
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Build a GET request with standard headers
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner
            .get(url)
            .header("accept", "application/json")
            .timeout(self.config.timeout)
    }
}

// ============================================================================
// HTTP JSON Source
// ============================================================================

/// [`JsonSource`] over HTTPS against one API base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    http: HttpClient,
}

impl HttpSource {
    /// # Errors
    ///
    /// Returns `ExplorerError::ClientInit` if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, config: HttpConfig) -> Result<Self, ExplorerError> {
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: HttpClient::with_config(config)?,
        })
    }

    async fn get_once(&self, url: &str, query: &[(String, String)]) -> Result<Value, ExplorerError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                ExplorerError::parse(format!("{url} did not return JSON: {e}"))
            } else {
                ExplorerError::Transport(e)
            }
        })
    }
}

impl JsonSource for HttpSource {
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, ExplorerError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {url} {query:?}");
        with_retry(&self.http.config().retry, || self.get_once(&url, query)).await
    }
}

// ============================================================================
// Retry
// ============================================================================

/// Run `op`, retrying retryable failures according to `policy`.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-retryable error immediately.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ExplorerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExplorerError>>,
{
    let attempt = || {
        let request = op();
        async move {
            request.await.map_err(|err| {
                if err.is_retryable() {
                    backoff::Error::transient(err)
                } else {
                    backoff::Error::permanent(err)
                }
            })
        }
    };
    let notify = |err: ExplorerError, delay: Duration| {
        tracing::warn!("Request failed, retrying in {delay:?}: {err}");
    };

    backoff::future::retry_notify(policy.backoff(), attempt, notify).await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn instant_retries(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    fn unavailable() -> ExplorerError {
        ExplorerError::HttpStatus {
            status: 503,
            url: "http://test/api/v2/stats".to_string(),
        }
    }

    /// Serve one canned HTTP response on a local port, returning the base URL.
    /// `None` accepts the request and never answers.
    async fn serve_once(response: Option<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            match response {
                Some(response) => {
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        format!("http://{addr}/api/v2")
    }

    fn response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn short_timeout() -> HttpConfig {
        HttpConfig::with_timeout(Duration::from_millis(200))
    }

    #[test]
    fn test_backoff_is_bounded_by_retry_count() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(400),
        };
        let mut backoff = policy.backoff();
        for _ in 0..3 {
            let delay = backoff.next_backoff().unwrap();
            // jitter is at most half the interval either way
            assert!(delay <= Duration::from_millis(600));
        }
        assert_eq!(backoff.next_backoff(), None);

        backoff.reset();
        assert!(backoff.next_backoff().is_some());
        assert_eq!(RetryPolicy::none().backoff().next_backoff(), None);
    }

    #[test]
    fn test_http_source_trims_base_url() {
        let source = HttpSource::new("https://example.org/api/v2/", HttpConfig::default()).unwrap();
        assert_eq!(source.base_url, "https://example.org/api/v2");
        assert_eq!(source.http.config().retry, RetryPolicy::none());
    }

    #[test]
    fn test_default_config_is_fail_fast() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.retry.max_retries, 0);

        let tuned = HttpConfig::with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::exponential(3));
        assert_eq!(tuned.timeout, Duration::from_secs(5));
        assert_eq!(tuned.retry.max_retries, 3);
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let mut calls = 0;
        let result = with_retry(&instant_retries(3), || {
            calls += 1;
            let attempt = calls;
            async move {
                if attempt < 3 {
                    Err(unavailable())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_limit() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&instant_retries(2), || {
            calls += 1;
            async { Err(unavailable()) }
        })
        .await;

        assert!(matches!(
            result,
            Err(ExplorerError::HttpStatus { status: 503, .. })
        ));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_no_retry_for_client_errors() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&instant_retries(5), || {
            calls += 1;
            async {
                Err(ExplorerError::HttpStatus {
                    status: 404,
                    url: String::new(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy_fails_fast() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&RetryPolicy::none(), || {
            calls += 1;
            async { Err(unavailable()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_http_source_decodes_json() {
        let base = serve_once(Some(response(
            "200 OK",
            "application/json",
            r#"{"items":[],"next_page_params":null}"#,
        )))
        .await;
        let source = HttpSource::new(base, short_timeout()).unwrap();

        let body = source
            .get_json("/blocks", &[("type".to_string(), "block".to_string())])
            .await
            .unwrap();

        assert_eq!(body["items"], serde_json::json!([]));
    }

    #[rstest]
    #[case::server_error(response("500 Internal Server Error", "text/plain", ""))]
    #[case::rate_limited(response("429 Too Many Requests", "text/plain", ""))]
    #[tokio::test]
    async fn test_http_source_maps_error_status(#[case] canned: String) {
        let base = serve_once(Some(canned)).await;
        let source = HttpSource::new(base, short_timeout()).unwrap();

        let err = source.get_json("/stats", &[]).await.unwrap_err();

        assert!(matches!(err, ExplorerError::HttpStatus { status: 500 | 429, ref url } if url.ends_with("/api/v2/stats")));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_http_source_rejects_non_json_body() {
        let base = serve_once(Some(response("200 OK", "text/html", "<html>oops</html>"))).await;
        let source = HttpSource::new(base, short_timeout()).unwrap();

        let err = source.get_json("/stats", &[]).await.unwrap_err();

        assert!(matches!(err, ExplorerError::MalformedResponse { .. }));
        assert!(err.to_string().contains("did not return JSON"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_http_source_times_out_stalled_requests() {
        let base = serve_once(None).await;
        let source = HttpSource::new(base, short_timeout()).unwrap();

        let started = tokio::time::Instant::now();
        let err = source.get_json("/stats", &[]).await.unwrap_err();

        assert!(matches!(err, ExplorerError::Transport(ref e) if e.is_timeout()));
        assert!(err.is_retryable());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
