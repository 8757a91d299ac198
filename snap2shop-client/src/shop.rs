//! Shop installation endpoints

use crate::BackendClient;
use crate::error::Result;
use snap2shop_core::dto::shop::InstallShop;
use tokio::task::JoinHandle;
use tracing::{info, warn};

impl BackendClient {
    /// Register an installed shop and its access token with the backend
    ///
    /// # Arguments
    /// * `shop` - The shop domain
    /// * `access_token` - Admin API access token issued during authentication
    pub async fn register_shop(&self, shop: &str, access_token: &str) -> Result<()> {
        let url = format!("{}/shopify/install", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&InstallShop {
                shop: shop.to_string(),
                access_token: access_token.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Fire-and-forget variant of [`register_shop`](Self::register_shop)
    ///
    /// Runs the registration on a detached task so the authentication flow
    /// it hangs off never waits for the backend. Failures are logged and
    /// otherwise dropped. The returned handle may be ignored.
    pub fn notify_install(&self, shop: &str, access_token: &str) -> JoinHandle<()> {
        let client = self.clone();
        let shop = shop.to_string();
        let access_token = access_token.to_string();

        tokio::spawn(async move {
            match client.register_shop(&shop, &access_token).await {
                Ok(()) => info!("Registered shop {} with backend", shop),
                Err(e) => warn!("Failed to register shop {} with backend: {}", shop, e),
            }
        })
    }
}
