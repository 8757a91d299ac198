//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod health;
mod index;
mod install;
mod search;

pub use index::IndexCommands;

use anyhow::Result;
use clap::Subcommand;
use snap2shop_client::ClientError;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Catalog indexing
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
    /// Register an installed shop with the backend
    Install {
        /// Shop domain (e.g. demo.myshopify.com)
        #[arg(long)]
        shop: String,

        /// Admin API access token
        #[arg(long, env = "SHOPIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Find products visually similar to an image
    Search {
        /// Shop domain whose catalog is searched
        #[arg(long)]
        shop: String,

        /// Path to the image to upload
        #[arg(long)]
        image: std::path::PathBuf,

        /// Maximum number of results
        #[arg(long, default_value_t = snap2shop_client::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Check backend health
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Index { command } => index::handle_index_command(command, config).await,
        Commands::Install { shop, token } => install::register(config, &shop, &token).await,
        Commands::Search { shop, image, limit } => {
            search::search(config, &shop, &image, limit).await
        }
        Commands::Health => health::check(config).await,
    }
}

/// Attaches a hint naming the likely cause of a backend failure
pub(crate) fn backend_error(err: ClientError, shop: &str) -> anyhow::Error {
    match failure_hint(&err, shop) {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => err.into(),
    }
}

fn failure_hint(err: &ClientError, shop: &str) -> Option<String> {
    if err.is_not_found() {
        Some(format!(
            "Shop {} is not registered with the backend; run `snap2shop install` first",
            shop
        ))
    } else if err.is_server_error() {
        Some("The backend failed to handle the request".to_string())
    } else if err.is_client_error() {
        Some("The backend rejected the request".to_string())
    } else if matches!(err, ClientError::RequestFailed(_)) {
        Some("Could not reach the backend".to_string())
    } else {
        None
    }
}
