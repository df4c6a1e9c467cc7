//! Content handlers
//!
//! Posts, comments and replies, plus the like and visibility toggles that
//! all three share.

use axum::{extract::State, Json};
use community_core::{ContentKind, Snowflake, Visibility};
use community_service::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse, PostDetailResponse,
    PostResponse, ReplyResponse, UpdatePostRequest, VisibilityResponse,
};
use community_service::ContentService;
use serde::Deserialize;

use crate::extractors::{AuthUser, Pagination, PathId, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct VisibilityQuery {
    #[serde(default)]
    pub visibility: Visibility,
}

/// GET /groups/{group_id}/posts?visibility=shown|hidden|all
pub async fn list_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
    QueryParams(query): QueryParams<VisibilityQuery>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = ContentService::new(state.service_context());
    let posts = service
        .list_posts(group_id, auth.account_id, query.visibility, pagination.window())
        .await?;
    Ok(Json(posts))
}

/// POST /groups/{group_id}/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = ContentService::new(state.service_context());
    let response = service
        .create_post(group_id, auth.account_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Post with its comment and reply tree
///
/// GET /posts/{post_id}?visibility=
pub async fn get_post(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(post_id): PathId,
    QueryParams(query): QueryParams<VisibilityQuery>,
) -> ApiResult<Json<PostDetailResponse>> {
    let service = ContentService::new(state.service_context());
    let response = service
        .get_post(post_id, auth.account_id, query.visibility)
        .await?;
    Ok(Json(response))
}

/// PATCH /posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(post_id): PathId,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let service = ContentService::new(state.service_context());
    let response = service
        .update_post(post_id, auth.account_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(post_id): PathId,
) -> ApiResult<NoContent> {
    let service = ContentService::new(state.service_context());
    service.delete_post(post_id, auth.account_id).await?;
    Ok(NoContent)
}

/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(post_id): PathId,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = ContentService::new(state.service_context());
    let response = service
        .create_comment(post_id, auth.account_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// POST /comments/{comment_id}/replies
pub async fn create_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(comment_id): PathId,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<ReplyResponse>>> {
    let service = ContentService::new(state.service_context());
    let response = service
        .create_reply(comment_id, auth.account_id, request)
        .await?;
    Ok(Created(Json(response)))
}

async fn toggle_like(
    state: &AppState,
    kind: ContentKind,
    id: Snowflake,
    auth: AuthUser,
) -> ApiResult<Json<LikeResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.toggle_like(kind, id, auth.account_id).await?))
}

async fn toggle_visibility(
    state: &AppState,
    kind: ContentKind,
    id: Snowflake,
    auth: AuthUser,
) -> ApiResult<Json<VisibilityResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(
        service.toggle_visibility(kind, id, auth.account_id).await?,
    ))
}

/// POST /posts/{post_id}/like
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<LikeResponse>> {
    toggle_like(&state, ContentKind::Post, id, auth).await
}

/// POST /comments/{comment_id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<LikeResponse>> {
    toggle_like(&state, ContentKind::Comment, id, auth).await
}

/// POST /replies/{reply_id}/like
pub async fn like_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<LikeResponse>> {
    toggle_like(&state, ContentKind::Reply, id, auth).await
}

/// POST /posts/{post_id}/visibility
pub async fn post_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<VisibilityResponse>> {
    toggle_visibility(&state, ContentKind::Post, id, auth).await
}

/// POST /comments/{comment_id}/visibility
pub async fn comment_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<VisibilityResponse>> {
    toggle_visibility(&state, ContentKind::Comment, id, auth).await
}

/// POST /replies/{reply_id}/visibility
pub async fn reply_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<VisibilityResponse>> {
    toggle_visibility(&state, ContentKind::Reply, id, auth).await
}
