//! Administrator tools.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::EditExpiry;
use domain::services::PublicIndex;
use persistence::InvitationStore;
use serde::Deserialize;
use shared::pagination::clamp_page_size;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::routes::invitations::{into_page, parse_cursor, InvitationResponse, ListQuery, ListResponse};

/// GET /api/v1/admin/invitations
pub async fn list_all_invitations(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let limit = clamp_page_size(query.limit);
    let after = parse_cursor(query.cursor.as_deref())?;
    let records = state.invitations.list_all(after.as_ref(), limit + 1).await?;
    Ok(Json(into_page(records, limit)))
}

/// `editExpiryDate: null` clears the lock.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditExpiryRequest {
    pub edit_expiry_date: Option<EditExpiry>,
}

/// PUT /api/v1/admin/invitations/:id/edit-expiry
pub async fn set_edit_expiry(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
    Json(request): Json<EditExpiryRequest>,
) -> Result<Json<InvitationResponse>, ApiError> {
    if let Some(expiry) = &request.edit_expiry_date {
        if expiry.instant().is_none() {
            return Err(ApiError::validation(
                "editExpiryDate must be an RFC 3339 timestamp, a YYYY-MM-DD date or {seconds, nanoseconds}",
            ));
        }
    }

    let owner_id = state
        .invitations
        .public_record(&id)
        .await?
        .and_then(|record| record.owner())
        .ok_or_else(|| ApiError::NotFound("Invitation not found".into()))?;

    let _guard = state
        .save_gate
        .try_acquire(owner_id, &id)
        .ok_or(ApiError::SaveInProgress)?;

    let mut record = state
        .invitations
        .get(owner_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".into()))?;
    record.data.edit_expiry_date = request.edit_expiry_date;

    let record = state.invitations.replace(owner_id, &id, &record.data).await?;
    info!(
        invitation_id = %id,
        owner_id = %owner_id,
        admin_id = %admin.user_id,
        locked = record.data.is_edit_locked(Utc::now()),
        "Edit expiry updated"
    );

    Ok(Json(InvitationResponse::new(record, &state.site.base_url)))
}
