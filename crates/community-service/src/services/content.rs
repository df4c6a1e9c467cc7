//! Content service
//!
//! Posts, comments and replies. Likes and visibility go through one generic
//! operation each, parameterized by [`ContentKind`].

use std::collections::HashMap;

use community_core::entities::{excerpt, Comment, ContentRef, LikeState, Post, Reply};
use community_core::events::{Notification, NotificationTarget};
use community_core::traits::Page;
use community_core::{ContentKind, DomainError, Snowflake, Visibility};
use tracing::{info, instrument};

use crate::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse, PostDetailResponse,
    PostResponse, ReplyResponse, UpdatePostRequest, VisibilityResponse, WithLikes,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Characters of a title or comment quoted in notifications
const EXCERPT_CHARS: usize = 10;

pub struct ContentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn access(&self) -> AccessService<'a> {
        AccessService::new(self.ctx)
    }

    async fn load_post(&self, post_id: Snowflake) -> ServiceResult<Post> {
        let post = self
            .ctx
            .content_repo()
            .find_post(post_id)
            .await?
            .ok_or(DomainError::content_not_found(ContentKind::Post, post_id))?;
        Ok(post)
    }

    async fn load_ref(&self, kind: ContentKind, id: Snowflake) -> ServiceResult<ContentRef> {
        let content = self
            .ctx
            .content_repo()
            .find_ref(kind, id)
            .await?
            .ok_or(DomainError::content_not_found(kind, id))?;
        Ok(content)
    }

    async fn like_map(
        &self,
        kind: ContentKind,
        ids: &[Snowflake],
        viewer_id: Snowflake,
    ) -> ServiceResult<HashMap<Snowflake, LikeState>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let states = self.ctx.content_repo().like_states(kind, ids, viewer_id).await?;
        Ok(states.into_iter().collect())
    }

    // ========================================================================
    // Creation
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        group_id: Snowflake,
        author_id: Snowflake,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        self.access().load_group(group_id).await?;
        self.access().require_active_member(group_id, author_id).await?;

        let post = Post::new(
            self.ctx.generate_id(),
            group_id,
            author_id,
            request.title.trim().to_string(),
            request.content,
        );
        self.ctx.content_repo().create_post(&post).await?;

        info!(post_id = %post.id, group_id = %group_id, "Post created");

        Ok(PostResponse::from(post))
    }

    /// Comment on a post; the post author is notified
    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        post_id: Snowflake,
        author_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let post = self.load_post(post_id).await?;
        self.access().require_active_member(post.group_id, author_id).await?;

        let comment = Comment::new(self.ctx.generate_id(), post_id, author_id, request.content);
        self.ctx.content_repo().create_comment(&comment).await?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");

        self.ctx
            .notify(
                Notification::new(
                    author_id,
                    format!(
                        "commented on your post {}",
                        excerpt(&post.title, EXCERPT_CHARS)
                    ),
                    NotificationTarget::Post(post_id),
                )
                .to(post.author_id)
                .excluding_sender(),
            )
            .await;

        Ok(CommentResponse::from(comment))
    }

    /// Reply to a comment; the comment author is notified
    #[instrument(skip(self, request))]
    pub async fn create_reply(
        &self,
        comment_id: Snowflake,
        author_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<ReplyResponse> {
        let parent = self.load_ref(ContentKind::Comment, comment_id).await?;
        self.access().require_active_member(parent.group_id, author_id).await?;

        let comment = self
            .ctx
            .content_repo()
            .find_comment(comment_id)
            .await?
            .ok_or(DomainError::content_not_found(ContentKind::Comment, comment_id))?;

        let reply = Reply::new(self.ctx.generate_id(), comment_id, author_id, request.content);
        self.ctx.content_repo().create_reply(&reply).await?;

        info!(reply_id = %reply.id, comment_id = %comment_id, "Reply created");

        self.ctx
            .notify(
                Notification::new(
                    author_id,
                    format!(
                        "replied on your comment '{}'",
                        excerpt(&comment.content, EXCERPT_CHARS)
                    ),
                    NotificationTarget::Comment(comment_id),
                )
                .to(comment.author_id)
                .excluding_sender(),
            )
            .await;

        Ok(ReplyResponse::from(reply))
    }

    // ========================================================================
    // Posts
    // ========================================================================

    /// Edit a post. Author only.
    #[instrument(skip(self, request))]
    pub async fn update_post(
        &self,
        post_id: Snowflake,
        actor_id: Snowflake,
        request: UpdatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let mut post = self.load_post(post_id).await?;
        if !post.is_author(actor_id) {
            return Err(DomainError::NotAuthor.into());
        }

        if request.title.is_some() || request.content.is_some() {
            post.edit(request.title.map(|t| t.trim().to_string()), request.content);
            self.ctx.content_repo().update_post(&post).await?;
            info!(post_id = %post_id, "Post updated");
        }

        let likes = self.like_map(ContentKind::Post, &[post_id], actor_id).await?;
        let state = likes.get(&post_id).copied();
        Ok(PostResponse::from(WithLikes::new(post, state)))
    }

    /// Delete a post. The author or a group admin.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let post = self.load_post(post_id).await?;
        if !post.is_author(actor_id) && !self.access().is_admin(post.group_id, actor_id).await? {
            return Err(DomainError::NotAuthor.into());
        }

        self.ctx.content_repo().delete_post(post_id).await?;

        info!(post_id = %post_id, actor_id = %actor_id, "Post deleted");

        Ok(())
    }

    /// Posts of a group, newest first. Anything but `Shown` is admin only.
    #[instrument(skip(self))]
    pub async fn list_posts(
        &self,
        group_id: Snowflake,
        viewer_id: Snowflake,
        visibility: Visibility,
        page: Page,
    ) -> ServiceResult<Vec<PostResponse>> {
        let group = self.access().load_group(group_id).await?;
        self.access().require_reader(&group, viewer_id).await?;
        self.access()
            .require_visibility(group_id, viewer_id, visibility)
            .await?;

        let posts = self
            .ctx
            .content_repo()
            .list_posts(group_id, visibility, page)
            .await?;
        let ids: Vec<Snowflake> = posts.iter().map(|p| p.id).collect();
        let likes = self.like_map(ContentKind::Post, &ids, viewer_id).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let state = likes.get(&post.id).copied();
                PostResponse::from(WithLikes::new(post, state))
            })
            .collect())
    }

    /// A post with its comments and their replies, all filtered by the
    /// same visibility predicate
    #[instrument(skip(self))]
    pub async fn get_post(
        &self,
        post_id: Snowflake,
        viewer_id: Snowflake,
        visibility: Visibility,
    ) -> ServiceResult<PostDetailResponse> {
        let post = self.load_post(post_id).await?;
        let group = self.access().load_group(post.group_id).await?;
        self.access().require_reader(&group, viewer_id).await?;
        self.access()
            .require_visibility(group.id, viewer_id, visibility)
            .await?;

        if !visibility.admits(post.is_hidden) && !post.is_author(viewer_id) {
            return Err(DomainError::content_not_found(ContentKind::Post, post_id).into());
        }

        let repo = self.ctx.content_repo();
        let comments = repo.list_comments(post_id, visibility).await?;
        let comment_ids: Vec<Snowflake> = comments.iter().map(|c| c.id).collect();
        let replies = repo.list_replies(&comment_ids, visibility).await?;
        let reply_ids: Vec<Snowflake> = replies.iter().map(|r| r.id).collect();

        let post_likes = self.like_map(ContentKind::Post, &[post_id], viewer_id).await?;
        let comment_likes = self
            .like_map(ContentKind::Comment, &comment_ids, viewer_id)
            .await?;
        let reply_likes = self.like_map(ContentKind::Reply, &reply_ids, viewer_id).await?;

        let mut replies_by_comment: HashMap<Snowflake, Vec<ReplyResponse>> = HashMap::new();
        for reply in replies {
            let state = reply_likes.get(&reply.id).copied();
            replies_by_comment
                .entry(reply.comment_id)
                .or_default()
                .push(ReplyResponse::from(WithLikes::new(reply, state)));
        }

        let comments = comments
            .into_iter()
            .map(|comment| {
                let id = comment.id;
                let state = comment_likes.get(&id).copied();
                let mut response = CommentResponse::from(WithLikes::new(comment, state));
                response.replies = replies_by_comment.remove(&id).unwrap_or_default();
                response
            })
            .collect();

        let state = post_likes.get(&post_id).copied();
        Ok(PostDetailResponse {
            post: PostResponse::from(WithLikes::new(post, state)),
            comments,
        })
    }

    // ========================================================================
    // Generic toggles
    // ========================================================================

    /// Like the content if the actor has not yet, unlike it otherwise.
    /// Toggling twice restores the original like-set.
    #[instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        kind: ContentKind,
        id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<LikeResponse> {
        let content = self.load_ref(kind, id).await?;
        self.access()
            .require_active_member(content.group_id, actor_id)
            .await?;

        let state = self.ctx.content_repo().toggle_like(kind, id, actor_id).await?;

        info!(kind = %kind, id = %id, liked = state.liked, "Like toggled");

        let verb = if state.liked {
            format!("liked your {kind}")
        } else {
            format!("unliked your {kind}")
        };
        self.ctx
            .notify(
                Notification::new(actor_id, verb, NotificationTarget::content(kind, id))
                    .to(content.author_id)
                    .excluding_sender(),
            )
            .await;

        Ok(LikeResponse::new(kind, id, state))
    }

    /// Flip the hidden flag. The author or a group admin. Children keep
    /// their own flags.
    #[instrument(skip(self))]
    pub async fn toggle_visibility(
        &self,
        kind: ContentKind,
        id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<VisibilityResponse> {
        let content = self.load_ref(kind, id).await?;
        if content.author_id != actor_id {
            self.access().require_admin(content.group_id, actor_id).await?;
        }

        let is_hidden = self.ctx.content_repo().toggle_hidden(kind, id).await?;

        info!(kind = %kind, id = %id, is_hidden, "Visibility toggled");

        Ok(VisibilityResponse {
            kind,
            id: id.to_string(),
            is_hidden,
        })
    }
}
