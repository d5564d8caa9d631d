//! Database module for the SQLite post store.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial module structure

pub mod connection;
pub mod posts;
pub mod queries;
