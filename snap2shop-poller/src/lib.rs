//! Snap2Shop Poller
//!
//! Client-side tracking of a shop's catalog indexing job.
//!
//! Architecture:
//! - Configuration: backend URL, poll interval and request timeout
//! - Repositories: the backend operations the poller depends on
//! - Scheduler: the polling session and its continue-or-stop rule
//!
//! A [`JobStatusPoller`] fetches the job status on a fixed interval,
//! publishes every successful snapshot to its observers and stops itself
//! once the job is `done` or `error`. Fetch failures are logged and retried
//! on the next tick with the last-known snapshot left in place.
//!
//! # Example
//!
//! ```no_run
//! use snap2shop_poller::{Config, JobStatusPoller};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let poller = JobStatusPoller::from_config(&Config::new("http://localhost:8000"))?;
//!     poller.on_update(|status| println!("{} ({}%)", status.status, status.progress_percent()));
//!
//!     poller.trigger_job("demo.myshopify.com").await?;
//!     poller.wait_idle().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;

pub use config::Config;
pub use error::PollError;
pub use repository::IndexRepository;
pub use scheduler::JobStatusPoller;
