//! Post, comment and reply database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub group_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReplyModel {
    pub id: i64,
    pub comment_id: i64,
    pub author_id: i64,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

/// Any content row joined up to its group
#[derive(Debug, Clone, FromRow)]
pub struct ContentRefModel {
    pub id: i64,
    pub group_id: i64,
    pub author_id: i64,
    pub is_hidden: bool,
}

/// Aggregated like-set state for one content row
#[derive(Debug, Clone, FromRow)]
pub struct LikeStateModel {
    pub id: i64,
    pub like_count: i64,
    pub liked: bool,
}
