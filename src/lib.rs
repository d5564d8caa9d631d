//! post-store library
//!
//! Keeps captioned image posts per user in a local SQLite file and drives
//! them from an interactive text menu.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial library structure

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod image;
pub mod output;
pub mod session;
