//! Content entities - posts, comments on posts, and replies to comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ContentKind, Snowflake};

/// Post entity, owned by a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub group_id: Snowflake,
    pub author_id: Snowflake,
    pub title: String,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: Snowflake,
        group_id: Snowflake,
        author_id: Snowflake,
        title: String,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            group_id,
            author_id,
            title,
            content,
            is_hidden: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_author(&self, account_id: Snowflake) -> bool {
        self.author_id == account_id
    }

    pub fn edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

/// Comment on a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: Snowflake, post_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            post_id,
            author_id,
            content,
            is_hidden: false,
            created_at: Utc::now(),
        }
    }
}

/// Reply to a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: Snowflake,
    pub comment_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(
        id: Snowflake,
        comment_id: Snowflake,
        author_id: Snowflake,
        content: String,
    ) -> Self {
        Self {
            id,
            comment_id,
            author_id,
            content,
            is_hidden: false,
            created_at: Utc::now(),
        }
    }
}

/// Kind-independent view of a post, comment or reply.
///
/// `group_id` is resolved through the parent chain so generic operations
/// can check membership without knowing the concrete kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: Snowflake,
    pub group_id: Snowflake,
    pub author_id: Snowflake,
    pub is_hidden: bool,
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    /// Whether the actor is in the like-set after the toggle
    pub liked: bool,
    pub like_count: i64,
}

/// First `max_chars` characters of `text`, with `...` appended if cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
