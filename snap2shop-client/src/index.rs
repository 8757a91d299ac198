//! Indexing API endpoints

use crate::BackendClient;
use crate::error::Result;
use snap2shop_core::domain::index::IndexStatus;
use snap2shop_core::dto::index::{IndexingTriggered, TriggerIndexing};
use tracing::debug;

impl BackendClient {
    // =============================================================================
    // Catalog Indexing
    // =============================================================================

    /// Ask the backend to (re)index a shop's product catalog
    ///
    /// The request is form-encoded with a single `shop_domain` field.
    ///
    /// # Arguments
    /// * `shop_domain` - The shop whose catalog should be indexed
    ///
    /// # Returns
    /// The acknowledgement carrying the new job id
    ///
    /// # Example
    /// ```no_run
    /// # use snap2shop_client::BackendClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = BackendClient::new("http://localhost:8000");
    /// let triggered = client.trigger_indexing("demo.myshopify.com").await?;
    /// println!("job {}", triggered.job_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn trigger_indexing(&self, shop_domain: &str) -> Result<IndexingTriggered> {
        let url = format!("{}/admin/index", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&TriggerIndexing {
                shop_domain: shop_domain.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the status of the latest indexing job for a shop
    ///
    /// # Arguments
    /// * `shop_domain` - The shop to query
    ///
    /// # Returns
    /// A fresh snapshot of the job. A shop that was never indexed reports
    /// `no_jobs`.
    pub async fn get_index_status(&self, shop_domain: &str) -> Result<IndexStatus> {
        let url = format!("{}/admin/index/status/{}", self.base_url, shop_domain);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
