//! Health command handler

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;

/// Print the backend health report
pub async fn check(config: &Config) -> Result<()> {
    let client = config.client()?;
    let health = client
        .health()
        .await
        .with_context(|| format!("Backend at {} is unreachable", client.base_url()))?;

    let status = if health.is_healthy() {
        health.status.green()
    } else {
        health.status.yellow()
    };

    println!("{}", format!("Backend {}", client.base_url()).bold());
    println!("  Status:       {}", status);
    println!(
        "  ML pipeline:  {}",
        if health.ml_pipeline {
            "ready".green()
        } else {
            "loading".yellow()
        }
    );
    if let Some(database) = &health.database {
        println!("  Database:     {}", database);
    }
    if let Some(version) = &health.version {
        println!("  Version:      {}", version.dimmed());
    }

    Ok(())
}
