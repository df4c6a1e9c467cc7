//! Membership handlers
//!
//! Joining and leaving, join-request review, suspension, removal and the
//! admin set.

use axum::{extract::State, Json};
use community_core::MemberFilter;
use community_service::dto::{AdminsResponse, MemberResponse, MembershipResponse};
use community_service::MembershipService;
use serde::Deserialize;

use crate::extractors::{AuthUser, Pagination, PathId, PathIds, QueryParams};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MemberQuery {
    #[serde(default)]
    pub filter: MemberFilter,
}

/// Join a public group, or request to join a private one
///
/// POST /groups/{group_id}/join
pub async fn join_group(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
) -> ApiResult<Created<Json<MembershipResponse>>> {
    let service = MembershipService::new(state.service_context());
    let response = service.join(group_id, auth.account_id).await?;
    Ok(Created(Json(response)))
}

/// POST /groups/{group_id}/leave
pub async fn leave_group(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
) -> ApiResult<NoContent> {
    let service = MembershipService::new(state.service_context());
    service.leave(group_id, auth.account_id).await?;
    Ok(NoContent)
}

/// Members by state; pending requests are visible to admins only
///
/// GET /groups/{group_id}/members?filter=active|suspended|pending
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
    QueryParams(query): QueryParams<MemberQuery>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let service = MembershipService::new(state.service_context());
    let members = service
        .list_members(group_id, auth.account_id, query.filter, pagination.window())
        .await?;
    Ok(Json(members))
}

/// DELETE /groups/{group_id}/members/{account_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    PathIds(group_id, account_id): PathIds,
) -> ApiResult<NoContent> {
    let service = MembershipService::new(state.service_context());
    service.remove(group_id, auth.account_id, account_id).await?;
    Ok(NoContent)
}

/// POST /groups/{group_id}/members/{account_id}/approve
pub async fn approve_member(
    State(state): State<AppState>,
    auth: AuthUser,
    PathIds(group_id, account_id): PathIds,
) -> ApiResult<Json<MembershipResponse>> {
    let service = MembershipService::new(state.service_context());
    let response = service.approve(group_id, auth.account_id, account_id).await?;
    Ok(Json(response))
}

/// POST /groups/{group_id}/members/{account_id}/reject
pub async fn reject_member(
    State(state): State<AppState>,
    auth: AuthUser,
    PathIds(group_id, account_id): PathIds,
) -> ApiResult<NoContent> {
    let service = MembershipService::new(state.service_context());
    service.reject(group_id, auth.account_id, account_id).await?;
    Ok(NoContent)
}

/// Suspend an active member or lift a suspension
///
/// POST /groups/{group_id}/members/{account_id}/suspension
pub async fn toggle_suspension(
    State(state): State<AppState>,
    auth: AuthUser,
    PathIds(group_id, account_id): PathIds,
) -> ApiResult<Json<MembershipResponse>> {
    let service = MembershipService::new(state.service_context());
    let response = service
        .toggle_suspension(group_id, auth.account_id, account_id)
        .await?;
    Ok(Json(response))
}

/// PUT /groups/{group_id}/admins/{account_id}
pub async fn add_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    PathIds(group_id, account_id): PathIds,
) -> ApiResult<Json<AdminsResponse>> {
    let service = MembershipService::new(state.service_context());
    let response = service.add_admin(group_id, auth.account_id, account_id).await?;
    Ok(Json(response))
}

/// DELETE /groups/{group_id}/admins/{account_id}
pub async fn remove_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    PathIds(group_id, account_id): PathIds,
) -> ApiResult<Json<AdminsResponse>> {
    let service = MembershipService::new(state.service_context());
    let response = service
        .remove_admin(group_id, auth.account_id, account_id)
        .await?;
    Ok(Json(response))
}
