//! Visual search endpoint
//!
//! Uploads an image and returns the shop's most similar products. A
//! [`VisualSearch`] session owns its single-flight flag so at most one
//! search per session is outstanding at a time.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::multipart::{Form, Part};
use snap2shop_core::domain::search::SearchResponse;
use tracing::{debug, info};

use crate::BackendClient;
use crate::error::{ClientError, Result};

/// Largest image the backend accepts
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Number of results requested when the caller does not say otherwise
pub const DEFAULT_SEARCH_LIMIT: usize = 24;

/// An image ready to be uploaded
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, inferring its content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| content_type_for(&ext.to_ascii_lowercase()))
            .unwrap_or("application/octet-stream");

        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Reject uploads the backend would refuse anyway
    pub fn validate(&self) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(ClientError::InvalidRequest(
                "Please select an image file".to_string(),
            ));
        }

        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ClientError::InvalidRequest(format!(
                "Image is too large ({} bytes, max {})",
                self.bytes.len(),
                MAX_IMAGE_BYTES
            )));
        }

        Ok(())
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

impl BackendClient {
    /// Find products visually similar to an image
    ///
    /// # Arguments
    /// * `shop_domain` - The shop whose catalog is searched
    /// * `image` - The uploaded image
    /// * `limit` - Maximum number of results
    pub async fn search(
        &self,
        shop_domain: &str,
        image: &ImageUpload,
        limit: usize,
    ) -> Result<SearchResponse> {
        image.validate()?;

        let url = format!("{}/search", self.base_url);
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new()
            .part("image", part)
            .text("shop_domain", shop_domain.to_string())
            .text("limit", limit.to_string());

        debug!(
            "Searching {} with {} ({} bytes)",
            shop_domain,
            image.file_name,
            image.bytes.len()
        );
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_response(response).await
    }
}

/// A search session for one shop
///
/// Only one search may be outstanding at a time; a second call while the
/// first is still running fails with [`ClientError::SearchInProgress`].
#[derive(Debug)]
pub struct VisualSearch {
    client: BackendClient,
    shop_domain: String,
    limit: usize,
    searching: AtomicBool,
}

impl VisualSearch {
    pub fn new(client: BackendClient, shop_domain: impl Into<String>) -> Self {
        Self {
            client,
            shop_domain: shop_domain.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            searching: AtomicBool::new(false),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Run a search unless one is already in flight
    pub async fn search(&self, image: &ImageUpload) -> Result<SearchResponse> {
        image.validate()?;

        if self.searching.swap(true, Ordering::AcqRel) {
            return Err(ClientError::SearchInProgress);
        }
        let _guard = SearchGuard(&self.searching);

        let response = self
            .client
            .search(&self.shop_domain, image, self.limit)
            .await?;
        info!(
            "Visual search for {} returned {} result(s) in {}ms",
            self.shop_domain, response.total_results, response.latency_ms
        );
        Ok(response)
    }
}

/// Clears the single-flight flag however the search ends
struct SearchGuard<'a>(&'a AtomicBool);

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
