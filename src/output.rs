//! Output formatting for posts.
//!
//! CHANGELOG:
//! - 10/17/2026 - Text and JSON rendering of posts

use crate::db::posts::Post;
use serde::Serialize;
use serde_json::json;

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
}

impl OutputControls {
    /// Serialize data according to output controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(json!(null));
        if self.compact {
            serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Post metadata as emitted in JSON mode (image bytes are summarised, not dumped).
#[derive(Debug, Serialize)]
pub struct PostView<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub image_bytes: usize,
    pub image_format: String,
}

impl<'a> From<&'a Post> for PostView<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            post,
            image_bytes: post.image.len(),
            image_format: post.image_format().to_string(),
        }
    }
}

/// Render one post as the human-readable block shown in the menu.
pub fn format_post(post: &Post) -> String {
    let mut out = String::new();
    out.push_str(&format!("User ID: {}\n", post.user_id));
    out.push_str(&format!("Post ID: {}\n", post.post_id));
    out.push_str(&format!("Text Caption: {}\n", post.caption));
    out.push_str(&format!(
        "Image: {} bytes ({})\n",
        post.image.len(),
        post.image_format()
    ));
    out.push_str(&format!("No. of comments: {}\n", post.comments));
    out.push_str(&format!("No. of likes: {}\n", post.likes));
    out.push_str(&"-".repeat(20));
    out
}

/// Render a list of posts as JSON.
pub fn posts_json(posts: &[Post], output: &OutputControls) -> String {
    let views: Vec<PostView> = posts.iter().map(PostView::from).collect();
    output.emit(&views)
}
