//! Health endpoint

use crate::BackendClient;
use crate::error::Result;
use snap2shop_core::domain::health::HealthStatus;

impl BackendClient {
    /// Fetch the backend health report
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
