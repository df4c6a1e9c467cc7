//! Event handlers

use axum::{extract::State, Json};
use community_service::dto::{
    CreateEventRequest, EventDetailResponse, EventListResponse, EventResponse,
    RsvpAnswerResponse, RsvpRequest, UpdateEventRequest,
};
use community_service::EventService;

use crate::extractors::{AuthUser, Body, PathId, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Events split into upcoming, ongoing and past
///
/// GET /groups/{group_id}/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
) -> ApiResult<Json<EventListResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.list_events(group_id, auth.account_id).await?))
}

/// POST /groups/{group_id}/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(group_id): PathId,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Created<Json<EventResponse>>> {
    let service = EventService::new(state.service_context());
    let response = service
        .create_event(group_id, auth.account_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(event_id): PathId,
) -> ApiResult<Json<EventDetailResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.get_event(event_id, auth.account_id).await?))
}

/// PATCH /events/{event_id}
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(event_id): PathId,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    let response = service
        .update_event(event_id, auth.account_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /events/{event_id}
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(event_id): PathId,
) -> ApiResult<NoContent> {
    let service = EventService::new(state.service_context());
    service.delete_event(event_id, auth.account_id).await?;
    Ok(NoContent)
}

/// PUT /events/{event_id}/rsvp
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(event_id): PathId,
    Body(request): Body<RsvpRequest>,
) -> ApiResult<Json<RsvpAnswerResponse>> {
    let service = EventService::new(state.service_context());
    let response = service
        .respond(event_id, auth.account_id, request)
        .await?;
    Ok(Json(response))
}
