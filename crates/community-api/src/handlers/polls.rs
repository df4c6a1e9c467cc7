//! Poll handlers

use axum::{extract::State, Json};
use community_service::dto::{
    CastVoteRequest, PollRequest, PollResponse, PollResultsResponse, VoteResponse,
};
use community_service::PollService;

use crate::extractors::{AuthUser, Body, PathId, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /groups/{group_id}/polls
pub async fn list_polls(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
) -> ApiResult<Json<Vec<PollResponse>>> {
    let service = PollService::new(state.service_context());
    Ok(Json(service.list_polls(group_id, auth.account_id).await?))
}

/// POST /groups/{group_id}/polls
pub async fn create_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
    ValidatedJson(request): ValidatedJson<PollRequest>,
) -> ApiResult<Created<Json<PollResponse>>> {
    let service = PollService::new(state.service_context());
    let response = service
        .create_poll(group_id, auth.account_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Replace a poll that has no votes yet
///
/// PATCH /polls/{poll_id}
pub async fn update_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(poll_id): PathId,
    ValidatedJson(request): ValidatedJson<PollRequest>,
) -> ApiResult<Json<PollResponse>> {
    let service = PollService::new(state.service_context());
    let response = service
        .update_poll(poll_id, auth.account_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /polls/{poll_id}
pub async fn delete_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(poll_id): PathId,
) -> ApiResult<NoContent> {
    let service = PollService::new(state.service_context());
    service.delete_poll(poll_id, auth.account_id).await?;
    Ok(NoContent)
}

/// GET /polls/{poll_id}/results
pub async fn get_results(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(poll_id): PathId,
) -> ApiResult<Json<PollResultsResponse>> {
    let service = PollService::new(state.service_context());
    Ok(Json(service.get_results(poll_id, auth.account_id).await?))
}

/// Cast the caller's vote
///
/// POST /polls/{poll_id}/votes
pub async fn cast_vote(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(poll_id): PathId,
    Body(request): Body<CastVoteRequest>,
) -> ApiResult<Created<Json<VoteResponse>>> {
    let service = PollService::new(state.service_context());
    let response = service
        .cast_vote(poll_id, auth.account_id, request)
        .await?;
    Ok(Created(Json(response)))
}
