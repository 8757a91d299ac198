//! Configuration module
//!
//! Handles CLI configuration including the backend URL and polling settings.

use std::time::Duration;

use snap2shop_client::BackendClient;
use snap2shop_poller::JobStatusPoller;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the visual search backend
    pub backend_url: String,

    /// Delay between status fetches while watching a job
    pub poll_interval: Duration,

    /// Per-request timeout
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Equivalent poller configuration
    pub fn poller_config(&self) -> snap2shop_poller::Config {
        let config = snap2shop_poller::Config::new(self.backend_url.clone())
            .with_poll_interval(self.poll_interval);

        match self.request_timeout {
            Some(timeout) => config.with_request_timeout(timeout),
            None => config,
        }
    }

    /// Backend client honouring the configured timeout
    pub fn client(&self) -> anyhow::Result<BackendClient> {
        let config = self.poller_config();
        config.validate()?;
        config.build_client()
    }

    /// Status poller for this backend
    pub fn poller(&self) -> anyhow::Result<JobStatusPoller> {
        JobStatusPoller::from_config(&self.poller_config())
    }
}
