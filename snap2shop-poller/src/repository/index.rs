//! Index repository
//!
//! The two backend operations the poller needs:
//! - Fetching the latest job status for a shop
//! - Triggering a new indexing job

use async_trait::async_trait;
use snap2shop_client::{BackendClient, Result};
use snap2shop_core::domain::index::IndexStatus;
use snap2shop_core::dto::index::IndexingTriggered;

/// Repository trait for indexing-related backend operations
#[async_trait]
pub trait IndexRepository: Send + Sync {
    /// Fetches the latest indexing job snapshot for a shop
    ///
    /// Transport failures, non-2xx responses and undecodable bodies are all
    /// reported as errors.
    async fn fetch_status(&self, shop_domain: &str) -> Result<IndexStatus>;

    /// Asks the backend to start indexing a shop's catalog
    async fn trigger_indexing(&self, shop_domain: &str) -> Result<IndexingTriggered>;
}

#[async_trait]
impl IndexRepository for BackendClient {
    async fn fetch_status(&self, shop_domain: &str) -> Result<IndexStatus> {
        self.get_index_status(shop_domain).await
    }

    async fn trigger_indexing(&self, shop_domain: &str) -> Result<IndexingTriggered> {
        BackendClient::trigger_indexing(self, shop_domain).await
    }
}
