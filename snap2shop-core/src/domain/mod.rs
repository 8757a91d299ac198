//! Core domain types
//!
//! This module contains the structures the Snap2Shop backend reports and the
//! merchant tooling consumes: indexing job snapshots, visual search results
//! and backend health.

pub mod health;
pub mod index;
pub mod search;

pub use index::{IndexStatus, JobId, Status};
