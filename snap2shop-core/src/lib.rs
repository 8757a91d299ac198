//! Snap2Shop Core
//!
//! Core types shared by the Snap2Shop merchant tooling.
//!
//! This crate contains:
//! - Domain types: indexing job snapshots, search results, backend health
//! - DTOs: request/response bodies for the backend API

pub mod domain;
pub mod dto;
