//! Catalogue feed client

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use recycle_catalog::{RawItem, WidgetState};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Fetches the catalogue with a per-attempt timeout and bounded retries.
///
/// A hung feed surfaces as [`FeedError::Timeout`] instead of leaving the
/// widget loading forever.
#[derive(Clone)]
pub struct CatalogueClient {
    inner: Client,
    config: Arc<FeedConfig>,
}

impl CatalogueClient {
    /// Create a client configured from the environment
    pub fn new() -> FeedResult<Self> {
        Self::with_config(FeedConfig::from_env()?)
    }

    /// Create a client with specific configuration
    pub fn with_config(config: FeedConfig) -> FeedResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("recycle-feed/1.0"));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(FeedError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch the raw catalogue records
    ///
    /// Connection failures, timeouts and 5xx/429 answers are retried. When
    /// every attempt fails that way the result is
    /// [`FeedError::RetriesExhausted`]; with a single attempt configured the
    /// failure is returned as is.
    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn fetch_items(&self) -> FeedResult<Vec<RawItem>> {
        let request_id = Uuid::new_v4().to_string();
        let retry = &self.config.retry;
        let mut last_error: Option<FeedError> = None;

        for attempt in 0..retry.max_attempts {
            if attempt > 0 {
                let delay = retry.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            match self.fetch_once(&request_id).await {
                Ok(items) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        items = items.len(),
                        elapsed_ms = start.elapsed().as_millis(),
                        "Catalogue fetched"
                    );
                    return Ok(items);
                }
                Err(e) if e.is_retryable() && retry.max_attempts > 1 => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        max_attempts = retry.max_attempts,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Fetch failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(FeedError::RetriesExhausted {
            attempts: retry.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Fetch the catalogue and settle `state` with the outcome
    pub async fn load(&self, state: WidgetState) -> WidgetState {
        state.apply_fetch(self.fetch_items().await)
    }

    /// One attempt, bounded by the configured timeout end to end
    async fn fetch_once(&self, request_id: &str) -> FeedResult<Vec<RawItem>> {
        match tokio::time::timeout(self.config.timeout, self.request(request_id)).await {
            Ok(Err(FeedError::Request(e))) if e.is_timeout() => {
                Err(FeedError::Timeout(self.config.timeout))
            }
            Ok(result) => result,
            Err(_) => Err(FeedError::Timeout(self.config.timeout)),
        }
    }

    async fn request(&self, request_id: &str) -> FeedResult<Vec<RawItem>> {
        let response = self
            .inner
            .get(&self.config.url)
            .header(X_REQUEST_ID, request_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FeedError::status(status.as_u16(), message));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
