//! Snap2Shop CLI
//!
//! Merchant command-line interface for the Snap2Shop visual search backend:
//! index a shop's catalog and follow the job, register installs, run visual
//! searches and check backend health.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snap2shop")]
#[command(about = "Snap2Shop visual search merchant CLI", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// Delay between status fetches while watching a job, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 3000)]
    poll_interval_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            backend_url: self.backend_url.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snap2shop_cli=info,snap2shop_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    debug!(
        "Using backend {} (poll interval: {:?})",
        config.backend_url, config.poll_interval
    );

    handle_command(cli.command, &config).await
}
