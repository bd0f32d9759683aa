use axum::{extract::State, Json};
use domain::models::user::UpdateProfileRequest;
use domain::models::UserProfile;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.auth.current_user(auth.user_id).await?;
    Ok(Json(user.profile()))
}

/// PUT /api/v1/me/profile
///
/// Both name and phone are required; a successful update completes the profile.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    request.validate()?;
    let user = state
        .auth
        .update_profile(auth.user_id, &request.name, &request.phone)
        .await?;
    Ok(Json(user.profile()))
}
