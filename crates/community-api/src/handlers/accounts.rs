//! Account handlers

use axum::{extract::State, Json};
use community_service::dto::{
    AccountResponse, CurrentAccountResponse, GroupResponse, UpdateProfileRequest,
};
use community_service::AccountService;

use crate::extractors::{AuthUser, PathId, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /accounts/@me
pub async fn get_current_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = AccountService::new(state.service_context());
    Ok(Json(service.me(auth.account_id).await?))
}

/// PATCH /accounts/@me
pub async fn update_current_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = AccountService::new(state.service_context());
    Ok(Json(service.update_profile(auth.account_id, request).await?))
}

/// GET /accounts/@me/groups
pub async fn get_current_account_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<GroupResponse>>> {
    let service = AccountService::new(state.service_context());
    Ok(Json(service.my_groups(auth.account_id).await?))
}

/// GET /accounts/{account_id}
pub async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(account_id): PathId,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    Ok(Json(service.get_account(account_id).await?))
}
