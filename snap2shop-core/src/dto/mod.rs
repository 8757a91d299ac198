//! Data Transfer Objects for backend communication
//!
//! Request and response bodies exchanged with the Snap2Shop backend that
//! are not domain snapshots in their own right.

pub mod index;
pub mod shop;
