//! Backend health domain model

use serde::{Deserialize, Serialize};

/// Health report returned by the backend's `/health` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall status, `healthy` when the backend is serving
    pub status: String,

    /// Whether the embedding pipeline finished loading
    #[serde(default)]
    pub ml_pipeline: bool,

    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.ml_pipeline
    }
}
