//! Visual search domain model
//!
//! Results of matching an uploaded image against a shop's indexed catalog.

use serde::{Deserialize, Serialize};

/// A single product similar to the uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub product_id: String,
    pub title: String,
    pub handle: String,

    /// Product image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Storefront URL of the product
    pub url: String,

    /// Similarity in `[0, 1]`
    pub score: f64,
}

impl SearchResult {
    /// Similarity as a whole percentage, e.g. `0.874` becomes `87`
    pub fn match_percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

/// Response of a visual search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,

    /// Backend-side latency in milliseconds
    #[serde(default)]
    pub latency_ms: u64,

    #[serde(default)]
    pub total_results: usize,
}
