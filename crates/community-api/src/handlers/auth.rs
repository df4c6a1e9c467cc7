//! Authentication handlers
//!
//! Registration, activation, login, token refresh and logout.

use axum::{extract::State, Json};
use community_service::dto::{
    ActivateRequest, AuthResponse, CurrentAccountResponse, LoginRequest, LogoutRequest,
    RefreshTokenRequest, RegisterRequest, RegisterResponse,
};
use community_service::AuthService;

use crate::extractors::{AuthUser, Body, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<RegisterResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Activate an account with its one-time token
///
/// POST /auth/activate
pub async fn activate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ActivateRequest>,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.activate(request).await?;
    Ok(Json(response))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Body(request): Body<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Revoke one refresh token, or all of them
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Body(request): Body<LogoutRequest>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    service.logout(auth.account_id, request).await?;
    Ok(NoContent)
}
