//! Group handlers
//!
//! Endpoints for group search and management.

use axum::{extract::State, Json};
use community_service::dto::{
    CreateGroupRequest, GroupDetailResponse, GroupResponse, PaginatedResponse, UpdateGroupRequest,
};
use community_service::GroupService;
use serde::Deserialize;

use crate::extractors::{AuthUser, Pagination, PathId, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Search groups by name or description
///
/// GET /groups?q=&page=&per_page=
pub async fn search_groups(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<SearchQuery>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<GroupResponse>>> {
    let service = GroupService::new(state.service_context());
    let response = service
        .search_groups(query.q.as_deref(), pagination.page, pagination.per_page)
        .await?;
    Ok(Json(response))
}

/// Create a new group
///
/// POST /groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> ApiResult<Created<Json<GroupResponse>>> {
    let service = GroupService::new(state.service_context());
    let response = service.create_group(auth.account_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get a group with its member count and the caller's standing
///
/// GET /groups/{group_id}
pub async fn get_group(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
) -> ApiResult<Json<GroupDetailResponse>> {
    let service = GroupService::new(state.service_context());
    let response = service.get_group(group_id, auth.account_id).await?;
    Ok(Json(response))
}

/// Update group settings
///
/// PATCH /groups/{group_id}
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
    ValidatedJson(request): ValidatedJson<UpdateGroupRequest>,
) -> ApiResult<Json<GroupResponse>> {
    let service = GroupService::new(state.service_context());
    let response = service
        .update_group(group_id, auth.account_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete a group
///
/// DELETE /groups/{group_id}
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
) -> ApiResult<NoContent> {
    let service = GroupService::new(state.service_context());
    service.delete_group(group_id, auth.account_id).await?;
    Ok(NoContent)
}
