//! Index command handlers
//!
//! Starts catalog indexing jobs and renders their status, either once or
//! continuously while a job is in progress.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use colored::*;
use snap2shop_core::domain::index::{IndexStatus, Status};
use snap2shop_poller::{JobStatusPoller, PollError};

use super::backend_error;
use crate::config::Config;

const PROGRESS_WIDTH: usize = 30;

/// Index subcommands
#[derive(Subcommand)]
pub enum IndexCommands {
    /// Start indexing a shop's catalog
    Start {
        /// Shop domain (e.g. demo.myshopify.com)
        #[arg(long)]
        shop: String,

        /// Return right after the job is queued instead of following it
        #[arg(long)]
        no_watch: bool,
    },
    /// Show the status of the latest indexing job
    Status {
        /// Shop domain
        #[arg(long)]
        shop: String,

        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow the latest indexing job until it finishes
    Watch {
        /// Shop domain
        #[arg(long)]
        shop: String,
    },
}

/// Handle index commands
pub async fn handle_index_command(command: IndexCommands, config: &Config) -> Result<()> {
    match command {
        IndexCommands::Start { shop, no_watch } => start_indexing(config, &shop, !no_watch).await,
        IndexCommands::Status { shop, json } => show_status(config, &shop, json).await,
        IndexCommands::Watch { shop } => {
            let poller = config.poller()?;
            follow(&poller, &shop, false).await
        }
    }
}

/// Trigger a job, optionally following it to completion
async fn start_indexing(config: &Config, shop: &str, watch: bool) -> Result<()> {
    if !watch {
        let client = config.client()?;
        let triggered = client
            .trigger_indexing(shop)
            .await
            .map_err(|e| backend_error(e, shop))
            .context("Failed to start indexing")?;
        println!(
            "{} Indexing job {} {}",
            "✓".green(),
            triggered.job_id.to_string().cyan(),
            colorize_status(&triggered.status)
        );
        return Ok(());
    }

    let poller = config.poller()?;
    follow(&poller, shop, true).await
}

/// Fetch once and print the snapshot
async fn show_status(config: &Config, shop: &str, json: bool) -> Result<()> {
    let client = config.client()?;
    let status = client
        .get_index_status(shop)
        .await
        .map_err(|e| backend_error(e, shop))
        .context("Failed to fetch index status")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status_details(shop, &status);
    }

    Ok(())
}

/// Poll until the job ends, Ctrl-C is pressed or the backend reports an error
async fn follow(poller: &JobStatusPoller, shop: &str, trigger: bool) -> Result<()> {
    poller.on_update(print_update);

    if trigger {
        let job_id = poller
            .trigger_job(shop)
            .await
            .map_err(|e| match e {
                PollError::Network(e) => backend_error(e, shop),
                other => other.into(),
            })
            .context("Failed to start indexing")?;
        println!(
            "{} Started indexing job {} for {}",
            "✓".green(),
            job_id.to_string().cyan(),
            shop.bold()
        );
    } else {
        poller.start(shop, false);
    }

    tokio::select! {
        _ = poller.wait_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            poller.stop();
            println!();
            let in_progress = poller
                .last_known()
                .is_some_and(|status| status.status.is_in_progress());
            if in_progress {
                println!("{}", "Stopped watching; the job keeps running on the backend.".yellow());
            } else {
                println!("{}", "Stopped watching.".yellow());
            }
            return Ok(());
        }
    }

    let Some(status) = poller.last_known() else {
        bail!("Could not fetch the index status for {}", shop);
    };

    println!();
    print_status_details(shop, &status);

    if status.status == Status::Error {
        bail!(
            "Indexing failed: {}",
            status.error.as_deref().unwrap_or("no details reported")
        );
    }

    Ok(())
}

/// Print one line per observed snapshot
fn print_update(status: &IndexStatus) {
    let now = Local::now().format("%H:%M:%S").to_string();
    let mut line = format!("{} {}", now.dimmed(), colorize_status(&status.status));

    if status.status == Status::Running {
        let percent = status.progress_percent();
        line.push_str(&format!(
            "  {} {:>3}%  ({} of {} products)",
            progress_bar(percent, PROGRESS_WIDTH),
            percent,
            status.processed,
            status.total
        ));
    }

    println!("{}", line);
}

/// Print the full snapshot
fn print_status_details(shop: &str, status: &IndexStatus) {
    println!("{}", format!("Product indexing for {}", shop).bold());
    println!("  Status:    {}", colorize_status(&status.status));

    if let Some(job_id) = &status.job_id {
        println!("  Job:       {}", job_id.to_string().cyan());
    }

    if status.status == Status::Running {
        let percent = status.progress_percent();
        println!(
            "  Progress:  {} {}%",
            progress_bar(percent, PROGRESS_WIDTH),
            percent
        );
        println!(
            "             Processing {} of {} products",
            status.processed, status.total
        );
    }

    if status.product_count > 0 {
        println!(
            "  Indexed:   {} products",
            status.product_count.to_string().bold()
        );
    }

    if let Some(started) = status.started_at {
        println!("  Started:   {}", format_timestamp(started).dimmed());
    }

    if let Some(finished) = status.finished_at {
        println!("  Finished:  {}", format_timestamp(finished).dimmed());

        if let Some(started) = status.started_at {
            let duration = finished.signed_duration_since(started);
            println!("  Duration:  {}s", duration.num_seconds());
        }
    }

    if let Some(error) = &status.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    match status.status {
        Status::NoJobs => println!(
            "\n{}",
            "Index your product catalog to enable visual search.".dimmed()
        ),
        Status::Done if status.product_count > 0 => println!(
            "\n{}",
            "Your products are indexed and ready for visual search.".green()
        ),
        _ => {}
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Human label for a status; unknown statuses are shown verbatim
fn status_label(status: &Status) -> &str {
    match status {
        Status::NoJobs => "Not Started",
        Status::Queued => "Queued",
        Status::Running => "Running",
        Status::Done => "Completed",
        Status::Error => "Error",
        Status::Unknown(raw) => raw,
    }
}

/// Colorize job status for display
fn colorize_status(status: &Status) -> ColoredString {
    let label = status_label(status);
    match status {
        Status::NoJobs => label.dimmed(),
        Status::Queued => label.cyan(),
        Status::Running => label.yellow(),
        Status::Done => label.green(),
        Status::Error => label.red(),
        Status::Unknown(_) => label.magenta(),
    }
}

/// Fixed-width bar; percentages above 100 render as a full bar
fn progress_bar(percent: u64, width: usize) -> String {
    let filled = ((percent.min(100) as usize) * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
