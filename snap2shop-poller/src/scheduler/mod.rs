//! Scheduler layer for the status poller
//!
//! This layer owns the polling session: it fetches job snapshots on a fixed
//! cadence, publishes them to observers and decides after every fetch
//! whether the session continues.

pub mod decision;
pub mod poller;

pub use decision::{Step, next_step};
pub use poller::JobStatusPoller;
