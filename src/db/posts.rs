//! Post store operations - shared by the interactive session and tests.
//!
//! These functions accept `&Connection` so the caller owns the single
//! process-wide handle. Each call auto-commits on its own.
//!
//! CHANGELOG:
//! - 10/17/2026 - CRUD over the shared posts table (Phase 1)

use rusqlite::{params, Connection, OptionalExtension, ToSql};
use serde::Serialize;
use tracing::{debug, info};

use super::queries;
use crate::error::{PostError, Result};
use crate::image::ImageFormat;

// ============================================================================
// Data Structures
// ============================================================================

/// One stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub post_id: i64,
    pub user_id: String,
    pub caption: String,
    #[serde(skip)]
    pub image: Vec<u8>,
    pub comments: i64,
    pub likes: i64,
}

impl Post {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            post_id: row.get(0)?,
            user_id: row.get(1)?,
            caption: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            image: row.get::<_, Option<Vec<u8>>>(3)?.unwrap_or_default(),
            comments: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            likes: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
        })
    }

    /// Format sniffed from the stored bytes.
    pub fn image_format(&self) -> ImageFormat {
        ImageFormat::sniff(&self.image)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Create the post namespace for `user_id` if it does not exist yet.
pub fn ensure_user_table(conn: &Connection, user_id: &str) -> Result<()> {
    let created = conn.execute(queries::ENSURE_USER, params![user_id])?;
    if created > 0 {
        info!(user_id, "created post namespace");
    }
    Ok(())
}

/// Whether `user_id` has a post namespace.
pub fn user_exists(conn: &Connection, user_id: &str) -> Result<bool> {
    let exists: bool = conn.query_row(queries::USER_EXISTS, params![user_id], |row| row.get(0))?;
    Ok(exists)
}

/// All user ids with a namespace, sorted.
pub fn list_users(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(queries::LIST_USERS)?;
    let users = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(users)
}

// ============================================================================
// Posts
// ============================================================================

/// Append a post and return its id. Counters start at zero.
pub fn insert(conn: &Connection, user_id: &str, caption: &str, image: &[u8]) -> Result<i64> {
    ensure_user_table(conn, user_id)?;
    conn.execute(queries::INSERT_POST, params![user_id, caption, image])?;
    let post_id = conn.last_insert_rowid();
    info!(user_id, post_id, bytes = image.len(), "inserted post");
    Ok(post_id)
}

/// Fetch one post by id, scoped to `user_id`.
pub fn get(conn: &Connection, user_id: &str, post_id: i64) -> Result<Post> {
    conn.query_row(queries::SELECT_POST, params![user_id, post_id], Post::from_row)
        .optional()?
        .ok_or_else(|| PostError::post_not_found(user_id, post_id))
}

/// Every post of `user_id`, oldest first.
pub fn get_all(conn: &Connection, user_id: &str) -> Result<Vec<Post>> {
    let mut stmt = conn.prepare(queries::SELECT_ALL_POSTS)?;
    let posts = stmt
        .query_map(params![user_id], Post::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(user_id, count = posts.len(), "loaded posts");
    Ok(posts)
}

/// Whether `post_id` exists for `user_id`.
pub fn exists(conn: &Connection, user_id: &str, post_id: i64) -> Result<bool> {
    let found: bool = conn.query_row(queries::POST_EXISTS, params![user_id, post_id], |row| {
        row.get(0)
    })?;
    Ok(found)
}

/// Replace the caption and/or image of an existing post.
///
/// Empty values count as "not provided". With nothing to change the call is
/// a successful no-op, but a missing post is still reported as `NotFound`.
pub fn update(
    conn: &Connection,
    user_id: &str,
    post_id: i64,
    caption: Option<&str>,
    image: Option<&[u8]>,
) -> Result<()> {
    if !exists(conn, user_id, post_id)? {
        return Err(PostError::post_not_found(user_id, post_id));
    }

    let caption = caption.filter(|c| !c.is_empty());
    let image = image.filter(|i| !i.is_empty());

    let mut columns: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();

    if let Some(c) = &caption {
        columns.push("post_caption");
        values.push(c);
    }
    if let Some(i) = &image {
        columns.push("image");
        values.push(i);
    }

    if columns.is_empty() {
        debug!(user_id, post_id, "update with no fields, nothing to do");
        return Ok(());
    }

    values.push(&user_id);
    values.push(&post_id);

    let sql = queries::update_post(&columns);
    conn.execute(&sql, values.as_slice())?;
    info!(user_id, post_id, fields = ?columns, "updated post");
    Ok(())
}

/// Remove a post. Succeeds whether or not the row existed.
pub fn delete(conn: &Connection, user_id: &str, post_id: i64) -> Result<()> {
    let removed = conn.execute(queries::DELETE_POST, params![user_id, post_id])?;
    info!(user_id, post_id, removed, "deleted post");
    Ok(())
}
