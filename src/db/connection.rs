//! SQLite connection management for the posts database.
//!
//! CHANGELOG:
//! - 10/17/2026 - Open read-write with schema bootstrap

use crate::error::{PostError, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

use super::queries;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "posts_data.db";

/// Open (creating if absent) the posts database and make sure the schema exists.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| PostError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    bootstrap(&conn)?;
    debug!(path = %path.display(), sqlite = rusqlite::version(), "opened posts database");
    Ok(conn)
}

/// In-memory database with the same schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    bootstrap(&conn)?;
    Ok(conn)
}

fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch(queries::CREATE_SCHEMA)?;
    Ok(())
}
