//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::template::strip_query;
use super::types::ProviderError;

/// Default request timeout for origin fetches, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent sent to tile origins. Some origins reject anonymous clients.
const DEFAULT_USER_AGENT: &str = concat!("tilebroker/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an error for transport failures and
    /// non-2xx statuses.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create async HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        // Query strings carry credentials; never log or report them.
        let safe_url = strip_query(url);
        trace!(url = safe_url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = safe_url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = safe_url,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::HttpError(format!(
                    "Request to {} failed{}",
                    safe_url,
                    if e.is_timeout() { " (timeout)" } else { "" }
                )));
            }
        };

        // Check HTTP status
        if !response.status().is_success() {
            warn!(
                url = safe_url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ProviderError::HttpStatus {
                status: response.status().as_u16(),
                url: safe_url.to_string(),
            });
        }

        // Read response body
        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = safe_url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = safe_url, error = %e, "Failed to read response body");
                Err(ProviderError::HttpError(format!(
                    "Failed to read response from {}",
                    safe_url
                )))
            }
        }
    }
}
