//! Registration, login and token refresh.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use shared::jwt::TokenPair;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::LoginPortal;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let response = state
        .auth
        .register(&request.email, &request.password, request.name, request.phone)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Customer login. The configured administrator is sent to the admin portal.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;
    let response = state
        .auth
        .login(&request.email, &request.password, LoginPortal::Customer)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;
    let response = state
        .auth
        .login(&request.email, &request.password, LoginPortal::Admin)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let tokens = state.auth.refresh(&request.refresh_token).await?;
    Ok(Json(tokens))
}
