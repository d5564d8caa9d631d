//! Runtime settings resolved from CLI flags and environment.
//!
//! CHANGELOG:
//! - 10/17/2026 - Output controls carried in Settings
//! - 10/17/2026 - Database path resolution and session settings

use crate::db::connection::DEFAULT_DB_FILE;
use crate::output::OutputControls;
use std::path::PathBuf;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "POST_STORE_DB";

/// Default bound on reprompts before an action is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Database path.
///
/// Tries, in order:
/// 1. explicit `--db` flag
/// 2. POST_STORE_DB env var
/// 3. `posts_data.db` in the working directory
pub fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    resolve_db_path_with(flag, std::env::var(DB_PATH_ENV).ok())
}

fn resolve_db_path_with(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    match env {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DB_FILE),
    }
}

/// Everything the session needs besides the connection and its I/O streams.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Preselected user; prompt when `None`.
    pub user: Option<String>,
    /// Create the preselected user if it does not exist.
    pub create_user: bool,
    /// Hand images to the system viewer when showing posts.
    pub display_images: bool,
    /// JSON/compact rendering of post listings.
    pub output: OutputControls,
    /// Reprompt bound for every input loop.
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: None,
            create_user: false,
            display_images: true,
            output: OutputControls::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
