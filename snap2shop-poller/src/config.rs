//! Poller configuration
//!
//! Defines the configurable parameters of the status poller: where the
//! backend lives, how often to poll and how long a single request may take.

use std::time::Duration;

use anyhow::Context;
use snap2shop_client::BackendClient;

/// Default delay between two status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Poller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://localhost:8000")
    pub backend_url: String,

    /// Delay between the end of one fetch and the start of the next
    pub poll_interval: Duration,

    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BACKEND_URL (required)
    /// - POLL_INTERVAL_MS (optional, milliseconds, default: 3000)
    /// - REQUEST_TIMEOUT_SECS (optional, seconds, default: transport default)
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url = std::env::var("BACKEND_URL")
            .map_err(|_| anyhow::anyhow!("BACKEND_URL environment variable not set"))?;

        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Ok(Self {
            backend_url,
            poll_interval,
            request_timeout,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend_url cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds a backend client honouring the request timeout
    pub fn build_client(&self) -> anyhow::Result<BackendClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(BackendClient::with_client(self.backend_url.clone(), http))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_millis(3000));
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.backend_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.backend_url = String::new();
        assert!(config.validate().is_err());

        config.backend_url = "https://search.example.com".to_string();
        assert!(config.validate().is_ok());

        // Zero interval would spin
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::new("http://backend:8000")
            .with_poll_interval(Duration::from_millis(500))
            .with_request_timeout(Duration::from_secs(10));

        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));

        let client = config.build_client().unwrap();
        assert_eq!(client.base_url(), "http://backend:8000");
    }

    // Kept in a single test: the process environment is shared between
    // test threads.
    #[test]
    fn test_from_env() {
        unsafe {
            std::env::remove_var("BACKEND_URL");
            std::env::remove_var("POLL_INTERVAL_MS");
            std::env::remove_var("REQUEST_TIMEOUT_SECS");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            std::env::set_var("BACKEND_URL", "http://backend:8000");
            std::env::set_var("POLL_INTERVAL_MS", "soon");
            std::env::set_var("REQUEST_TIMEOUT_SECS", "15");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.backend_url, "http://backend:8000");
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));

        unsafe {
            std::env::set_var("POLL_INTERVAL_MS", "750");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(750));

        unsafe {
            std::env::remove_var("BACKEND_URL");
            std::env::remove_var("POLL_INTERVAL_MS");
            std::env::remove_var("REQUEST_TIMEOUT_SECS");
        }
    }
}
