//! Configuration for the catalogue feed client
//!
//! The feed URL carries a signed query string, so it is never compiled in; it
//! comes from the environment or is set explicitly.

use crate::error::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default per-attempt timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry policy with exponential backoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    #[serde(with = "millis")]
    pub initial_delay: Duration,
    /// Upper bound on any delay
    #[serde(with = "millis")]
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add up to 25% random jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a config with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Builder-style method to set the attempt count
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Calculate delay for a given attempt (attempt 0 never waits)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powi(attempt as i32 - 1);

        let delay_secs = base_delay.min(self.max_delay.as_secs_f64());

        let final_delay = if self.jitter {
            delay_secs * (1.0 + rand_simple() * 0.25)
        } else {
            delay_secs
        };

        Duration::from_secs_f64(final_delay)
    }
}

/// Simple pseudo-random number generator (0.0 to 1.0)
fn rand_simple() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default(),
    );
    (hasher.finish() % 1000) as f64 / 1000.0
}

mod millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

/// Feed client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Catalogue endpoint
    pub url: String,
    /// Per-attempt timeout, covering connect, response and body
    #[serde(with = "secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl FeedConfig {
    /// Create configuration for `url` with default timeout and retry
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `RECYCLE_FEED_URL`: catalogue endpoint (required)
    /// - `RECYCLE_FEED_TIMEOUT_SECS`: per-attempt timeout in seconds
    /// - `RECYCLE_FEED_MAX_ATTEMPTS`: attempts before giving up
    pub fn from_env() -> FeedResult<Self> {
        let url = env::var("RECYCLE_FEED_URL")
            .map_err(|_| FeedError::MissingEnvVar("RECYCLE_FEED_URL".to_string()))?;

        let timeout = env::var("RECYCLE_FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let mut retry = RetryConfig::default();
        if let Some(attempts) = env::var("RECYCLE_FEED_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            retry.max_attempts = attempts;
        }

        let config = Self { url, timeout, retry };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> FeedResult<()> {
        if self.url.is_empty() {
            return Err(FeedError::config("url cannot be empty"));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(FeedError::config("url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(FeedError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(FeedError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = FeedConfig::new("https://feed.example/items");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = FeedConfig::new("https://feed.example/items")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryConfig::no_retry());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_validation() {
        assert!(FeedConfig::new("").validate().is_err());
        assert!(FeedConfig::new("ftp://feed.example").validate().is_err());
        assert!(FeedConfig::new("https://feed.example")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(FeedConfig::new("https://feed.example")
            .with_retry(RetryConfig::default().with_max_attempts(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_backoff() {
        let retry = RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(retry.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(500));
        assert_eq!(retry.delay_for_attempt(10), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_bounded() {
        let retry = RetryConfig::default();
        let delay = retry.delay_for_attempt(1);
        assert!(delay >= Duration::from_millis(250));
        assert!(delay <= Duration::from_millis(313));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config: FeedConfig = serde_json::from_str(
            r#"{"url": "https://feed.example", "timeout": 10,
                "retry": {"max_attempts": 2, "initial_delay": 100, "max_delay": 1000,
                          "backoff_multiplier": 2.0, "jitter": false}}"#,
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.initial_delay, Duration::from_millis(100));
    }
}
