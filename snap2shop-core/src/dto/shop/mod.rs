//! Shop installation DTOs

use serde::{Deserialize, Serialize};

/// Registers a freshly authenticated shop with the backend
#[derive(Clone, Serialize, Deserialize)]
pub struct InstallShop {
    pub shop: String,
    pub access_token: String,
}

impl std::fmt::Debug for InstallShop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallShop")
            .field("shop", &self.shop)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
