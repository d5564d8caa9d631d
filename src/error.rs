//! Error taxonomy for the post store.
//!
//! CHANGELOG:
//! - 10/17/2026 - Separate viewer launch failures from image read errors
//! - 10/17/2026 - Initial error types for storage, image I/O and lookups

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by store, image and display operations.
#[derive(Debug, Error)]
pub enum PostError {
    /// The database file could not be opened or created.
    #[error("cannot open database at {path:?}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed inside SQLite (malformed SQL, locked file, constraint).
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// An image file could not be opened or read.
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system image viewer could not be started.
    #[error("cannot launch image viewer for {path:?}: {source}")]
    Viewer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested user or post does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Input rejected by image validation.
    #[error("{0}")]
    Validation(String),
}

impl PostError {
    pub fn post_not_found(user_id: &str, post_id: i64) -> Self {
        PostError::NotFound(format!("post {} for user '{}'", post_id, user_id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PostError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PostError>;
