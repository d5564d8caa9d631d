//! SQL for the posts database.
//!
//! Every statement binds `user_id` as a parameter; no identifier is built from
//! user input.
//!
//! CHANGELOG:
//! - 10/17/2026 - Single posts table keyed by user_id (replaces table-per-user)

/// Schema bootstrap, safe to run on every open.
pub const CREATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS posts (
    post_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(user_id),
    post_caption TEXT,
    image BLOB,
    comments INTEGER DEFAULT 0,
    likes INTEGER DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_posts_user ON posts(user_id, post_id);
"#;

/// Create a user namespace if absent.
pub const ENSURE_USER: &str = r#"
INSERT OR IGNORE INTO users (user_id) VALUES (?1)
"#;

/// Check whether a user namespace exists.
pub const USER_EXISTS: &str = r#"
SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)
"#;

/// All known user ids.
pub const LIST_USERS: &str = r#"
SELECT user_id FROM users ORDER BY user_id
"#;

/// Append a post; counters take their column defaults.
pub const INSERT_POST: &str = r#"
INSERT INTO posts (user_id, post_caption, image) VALUES (?1, ?2, ?3)
"#;

/// Fetch one post scoped to its owner.
pub const SELECT_POST: &str = r#"
SELECT post_id, user_id, post_caption, image, comments, likes
FROM posts
WHERE user_id = ?1 AND post_id = ?2
"#;

/// Fetch every post of one user in insertion order.
pub const SELECT_ALL_POSTS: &str = r#"
SELECT post_id, user_id, post_caption, image, comments, likes
FROM posts
WHERE user_id = ?1
ORDER BY post_id
"#;

/// Existence predicate for a single post.
pub const POST_EXISTS: &str = r#"
SELECT EXISTS(SELECT 1 FROM posts WHERE user_id = ?1 AND post_id = ?2)
"#;

/// Remove a post; no error when the row is absent.
pub const DELETE_POST: &str = r#"
DELETE FROM posts WHERE user_id = ?1 AND post_id = ?2
"#;

/// Build a partial `UPDATE` from the names of the columns being replaced.
///
/// Columns are bound as `?1..?n`, followed by `user_id` and `post_id`.
/// Column names come from a fixed set chosen by the caller, never from input.
pub fn update_post(columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = ?{}", col, i + 1))
        .collect();
    let n = columns.len();
    format!(
        "UPDATE posts SET {} WHERE user_id = ?{} AND post_id = ?{}",
        assignments.join(", "),
        n + 1,
        n + 2
    )
}
