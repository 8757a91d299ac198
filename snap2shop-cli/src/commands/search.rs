//! Search command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use snap2shop_client::{ImageUpload, VisualSearch};
use snap2shop_core::domain::search::SearchResult;

use super::backend_error;
use crate::config::Config;

/// Upload an image and list similar products
pub async fn search(config: &Config, shop: &str, image: &Path, limit: usize) -> Result<()> {
    let upload = ImageUpload::from_path(image).await?;
    let session = VisualSearch::new(config.client()?, shop).with_limit(limit);

    let response = session
        .search(&upload)
        .await
        .map_err(|e| backend_error(e, shop))
        .context("Search failed. Please try again.")?;

    if response.results.is_empty() {
        println!(
            "{}",
            "No similar products found. Try a different image.".yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Found {} similar product(s) in {}ms:",
            response.results.len(),
            response.latency_ms
        )
        .bold()
    );
    println!();
    for result in &response.results {
        print_result(result);
    }

    Ok(())
}

fn print_result(result: &SearchResult) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        result.title.bold(),
        format!("{}% match", result.match_percent()).green()
    );
    println!("    {}", result.url.dimmed());
    if let Some(image) = &result.image {
        println!("    {}", image.dimmed());
    }
    println!();
}
