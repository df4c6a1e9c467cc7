//! PostgreSQL implementation of ContentRepository
//!
//! Posts, comments and replies share one like/visibility code path; the
//! per-kind tables are picked by [`ContentTables::of`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use community_core::entities::{Comment, ContentRef, LikeState, Post, Reply};
use community_core::error::DomainError;
use community_core::traits::{ContentRepository, Page, RepoResult};
use community_core::value_objects::{ContentKind, Snowflake, Visibility};

use crate::mappers::content_ref;
use crate::models::{CommentModel, ContentRefModel, LikeStateModel, PostModel, ReplyModel};

use super::error::{is_foreign_key_violation, map_db_error};

/// Table names backing one content kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContentTables {
    table: &'static str,
    likes: &'static str,
    like_key: &'static str,
}

impl ContentTables {
    fn of(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Post => Self {
                table: "posts",
                likes: "post_likes",
                like_key: "post_id",
            },
            ContentKind::Comment => Self {
                table: "comments",
                likes: "comment_likes",
                like_key: "comment_id",
            },
            ContentKind::Reply => Self {
                table: "replies",
                likes: "reply_likes",
                like_key: "reply_id",
            },
        }
    }
}

/// Resolves a content row to its owning group
fn ref_query(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Post => {
            "SELECT id, group_id, author_id, is_hidden FROM posts WHERE id = $1"
        }
        ContentKind::Comment => {
            r"
            SELECT c.id, p.group_id, c.author_id, c.is_hidden
            FROM comments c
            INNER JOIN posts p ON p.id = c.post_id
            WHERE c.id = $1
            "
        }
        ContentKind::Reply => {
            r"
            SELECT r.id, p.group_id, r.author_id, r.is_hidden
            FROM replies r
            INNER JOIN comments c ON c.id = r.comment_id
            INNER JOIN posts p ON p.id = c.post_id
            WHERE r.id = $1
            "
        }
    }
}

#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create_post(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, group_id, author_id, title, content, is_hidden, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.group_id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.is_hidden)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::GroupNotFound(post.group_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_post(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, group_id, author_id, title, content, is_hidden, created_at, updated_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update_post(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE posts SET title = $2, content = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(post.id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::content_not_found(ContentKind::Post, post.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::content_not_found(ContentKind::Post, id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_posts(
        &self,
        group_id: Snowflake,
        visibility: Visibility,
        page: Page,
    ) -> RepoResult<Vec<Post>> {
        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, group_id, author_id, title, content, is_hidden, created_at, updated_at
            FROM posts
            WHERE group_id = $1 AND ($2::BOOLEAN IS NULL OR is_hidden = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(group_id.into_inner())
        .bind(visibility.hidden_filter())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    // ------------------------------------------------------------------
    // Comments and replies
    // ------------------------------------------------------------------

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create_comment(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, post_id, author_id, content, is_hidden, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.content)
        .bind(comment.is_hidden)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::content_not_found(ContentKind::Post, comment.post_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_comment(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, content, is_hidden, created_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn list_comments(
        &self,
        post_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, content, is_hidden, created_at
            FROM comments
            WHERE post_id = $1 AND ($2::BOOLEAN IS NULL OR is_hidden = $2)
            ORDER BY created_at, id
            ",
        )
        .bind(post_id.into_inner())
        .bind(visibility.hidden_filter())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, reply), fields(reply_id = %reply.id))]
    async fn create_reply(&self, reply: &Reply) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO replies (id, comment_id, author_id, content, is_hidden, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(reply.id.into_inner())
        .bind(reply.comment_id.into_inner())
        .bind(reply.author_id.into_inner())
        .bind(&reply.content)
        .bind(reply.is_hidden)
        .bind(reply.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::content_not_found(ContentKind::Comment, reply.comment_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_reply(&self, id: Snowflake) -> RepoResult<Option<Reply>> {
        let result = sqlx::query_as::<_, ReplyModel>(
            r"
            SELECT id, comment_id, author_id, content, is_hidden, created_at
            FROM replies
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reply::from))
    }

    #[instrument(skip(self, comment_ids), fields(comments = comment_ids.len()))]
    async fn list_replies(
        &self,
        comment_ids: &[Snowflake],
        visibility: Visibility,
    ) -> RepoResult<Vec<Reply>> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = comment_ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, ReplyModel>(
            r"
            SELECT id, comment_id, author_id, content, is_hidden, created_at
            FROM replies
            WHERE comment_id = ANY($1) AND ($2::BOOLEAN IS NULL OR is_hidden = $2)
            ORDER BY created_at, id
            ",
        )
        .bind(&raw)
        .bind(visibility.hidden_filter())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Reply::from).collect())
    }

    // ------------------------------------------------------------------
    // Shared across kinds
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_ref(&self, kind: ContentKind, id: Snowflake) -> RepoResult<Option<ContentRef>> {
        let result = sqlx::query_as::<_, ContentRefModel>(ref_query(kind))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(|model| content_ref(kind, model)))
    }

    #[instrument(skip(self))]
    async fn toggle_like(
        &self,
        kind: ContentKind,
        id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<LikeState> {
        let tables = ContentTables::of(kind);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = $1 AND account_id = $2",
            tables.likes, tables.like_key
        ))
        .bind(id.into_inner())
        .bind(account_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            > 0;

        if !removed {
            sqlx::query(&format!(
                "INSERT INTO {} ({}, account_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                tables.likes, tables.like_key
            ))
            .bind(id.into_inner())
            .bind(account_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DomainError::content_not_found(kind, id)
                } else {
                    map_db_error(e)
                }
            })?;
        }

        let like_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            tables.likes, tables.like_key
        ))
        .bind(id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(LikeState {
            liked: !removed,
            like_count,
        })
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn like_states(
        &self,
        kind: ContentKind,
        ids: &[Snowflake],
        viewer: Snowflake,
    ) -> RepoResult<Vec<(Snowflake, LikeState)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let tables = ContentTables::of(kind);
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, LikeStateModel>(&format!(
            r"
            SELECT t.id,
                   COUNT(l.account_id) AS like_count,
                   COALESCE(BOOL_OR(l.account_id = $2), FALSE) AS liked
            FROM {table} t
            LEFT JOIN {likes} l ON l.{key} = t.id
            WHERE t.id = ANY($1)
            GROUP BY t.id
            ",
            table = tables.table,
            likes = tables.likes,
            key = tables.like_key,
        ))
        .bind(&raw)
        .bind(viewer.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn toggle_hidden(&self, kind: ContentKind, id: Snowflake) -> RepoResult<bool> {
        let tables = ContentTables::of(kind);

        sqlx::query_scalar::<_, bool>(&format!(
            "UPDATE {} SET is_hidden = NOT is_hidden WHERE id = $1 RETURNING is_hidden",
            tables.table
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| DomainError::content_not_found(kind, id))
    }
}
