//! Install command handler

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;

/// Hand the shop and its token to the backend
///
/// Registration is fire-and-forget: failures are logged by the client and
/// never fail the command. The CLI only waits so the process does not exit
/// before the request goes out.
pub async fn register(config: &Config, shop: &str, token: &str) -> Result<()> {
    let client = config.client()?;

    client
        .notify_install(shop, token)
        .await
        .context("Install registration task panicked")?;

    println!("{} Install registration sent for {}", "✓".green(), shop.bold());
    Ok(())
}
