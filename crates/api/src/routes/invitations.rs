//! Owner-scoped invitation routes.
//!
//! Every route here resolves `(authenticated user, id)`; a document owned by
//! someone else is indistinguishable from a missing one.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use domain::models::{merge_document, InvitationData, InvitationRecord, InvitationSummary};
use domain::services::export::{deliver_download, deliver_share};
use domain::services::suggestion::{SUCCESS_MESSAGE, SUCCESS_TITLE};
use domain::services::{
    apply_all, render_card, share, validate_document, CaptureStrategy, CaptureTarget, Delivery,
    EditorCommand, ExportError, ExportPipeline, SinkKind, Suggestion, SuggestionRequest,
    UnavailableShareSheet,
};
use persistence::{InvitationStore, PageCursor, StoreError};
use serde::{Deserialize, Serialize};
use shared::crypto::{generate_public_id, is_valid_public_id, PUBLIC_ID_LEN};
use shared::pagination::{clamp_page_size, decode_cursor, encode_cursor};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_card_export, record_invitation_saved, record_suggestion};
use crate::views;

/// Attempts at drawing an unused public id before giving up.
const ID_ALLOCATION_ATTEMPTS: usize = 5;

const EDIT_LOCKED_MESSAGE: &str = "Editing period for this invitation has ended";

/// Keys only administrators may write through a whole-document save.
const ADMIN_ONLY_KEYS: [&str; 1] = ["editExpiryDate"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: String,
    pub public_url: String,
    pub data: InvitationData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvitationResponse {
    pub fn new(record: InvitationRecord, base_url: &str) -> Self {
        Self {
            public_url: share::public_url(base_url, Some(&record.id)),
            id: record.id,
            data: record.data,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<InvitationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Decodes an optional cursor query parameter.
pub fn parse_cursor(cursor: Option<&str>) -> Result<Option<PageCursor>, ApiError> {
    cursor
        .map(|c| {
            let (updated_at, id) = decode_cursor(c)?;
            Ok(PageCursor { updated_at, id })
        })
        .transpose()
}

/// Turns a `limit + 1` fetch into a page plus the cursor for the next one.
pub fn into_page(mut records: Vec<InvitationRecord>, limit: u32) -> ListResponse {
    let has_more = records.len() > limit as usize;
    records.truncate(limit as usize);
    let next_cursor = if has_more {
        records
            .last()
            .map(|last| encode_cursor(last.updated_at, &last.id))
    } else {
        None
    };
    ListResponse {
        items: records.iter().map(InvitationSummary::from).collect(),
        next_cursor,
    }
}

fn check_id(id: &str) -> Result<(), ApiError> {
    if is_valid_public_id(id) {
        Ok(())
    } else {
        Err(ApiError::NotFound("Invitation not found".into()))
    }
}

async fn load_own(state: &AppState, owner_id: Uuid, id: &str) -> Result<InvitationRecord, ApiError> {
    check_id(id)?;
    state
        .invitations
        .get(owner_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".into()))
}

fn ensure_editable(auth: &UserAuth, data: &InvitationData) -> Result<(), ApiError> {
    if !auth.is_admin() && data.is_edit_locked(Utc::now()) {
        return Err(ApiError::Forbidden(EDIT_LOCKED_MESSAGE.into()));
    }
    Ok(())
}

/// The document a merge save would produce, checked before anything is
/// written.
fn merged_preview(
    current: &InvitationData,
    patch: &serde_json::Value,
) -> Result<InvitationData, ApiError> {
    let mut document = serde_json::to_value(current)
        .map_err(|e| ApiError::Internal(format!("Failed to encode invitation: {}", e)))?;
    merge_document(&mut document, patch.clone());
    let next: InvitationData = serde_json::from_value(document)
        .map_err(|e| ApiError::validation(format!("Invalid invitation document: {}", e)))?;
    validate_document(&next)?;
    Ok(next)
}

/// POST /api/v1/invitations
///
/// Starts a new invitation from the sample document under a fresh public id.
pub async fn create_invitation(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<(StatusCode, Json<InvitationResponse>), ApiError> {
    let data = InvitationData::initial();

    for _ in 0..ID_ALLOCATION_ATTEMPTS {
        let id = generate_public_id(PUBLIC_ID_LEN);
        match state.invitations.create(auth.user_id, &id, &data).await {
            Ok(record) => {
                info!(invitation_id = %record.id, owner_id = %auth.user_id, "Invitation created");
                record_invitation_saved();
                let response = InvitationResponse::new(record, &state.site.base_url);
                return Ok((StatusCode::CREATED, Json(response)));
            }
            Err(StoreError::Conflict(_)) => {
                warn!(invitation_id = %id, "Public id collision, drawing another");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ApiError::Internal(
        "Could not allocate a public invitation id".into(),
    ))
}

/// GET /api/v1/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let limit = clamp_page_size(query.limit);
    let after = parse_cursor(query.cursor.as_deref())?;
    let records = state
        .invitations
        .list_for_owner(auth.user_id, after.as_ref(), limit + 1)
        .await?;
    Ok(Json(into_page(records, limit)))
}

/// GET /api/v1/invitations/:id
pub async fn get_invitation(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
) -> Result<Json<InvitationResponse>, ApiError> {
    let record = load_own(&state, auth.user_id, &id).await?;
    Ok(Json(InvitationResponse::new(record, &state.site.base_url)))
}

/// PUT /api/v1/invitations/:id
///
/// Whole-document save with merge semantics: nested objects merge, arrays
/// and scalars replace. Only existing documents can be saved; new ones come
/// from `POST /api/v1/invitations`.
pub async fn save_invitation(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
    Json(mut patch): Json<serde_json::Value>,
) -> Result<Json<InvitationResponse>, ApiError> {
    check_id(&id)?;
    let Some(fields) = patch.as_object_mut() else {
        return Err(ApiError::validation("Invitation document must be a JSON object"));
    };
    if !auth.is_admin() {
        for key in ADMIN_ONLY_KEYS {
            fields.remove(key);
        }
    }

    let _guard = state
        .save_gate
        .try_acquire(auth.user_id, &id)
        .ok_or(ApiError::SaveInProgress)?;

    let existing = load_own(&state, auth.user_id, &id).await?;
    ensure_editable(&auth, &existing.data)?;
    merged_preview(&existing.data, &patch)?;

    let record = state.invitations.merge(auth.user_id, &id, patch).await?;
    info!(invitation_id = %record.id, owner_id = %auth.user_id, "Invitation saved");
    record_invitation_saved();

    Ok(Json(InvitationResponse::new(record, &state.site.base_url)))
}

#[derive(Debug, Deserialize)]
pub struct EditBatch {
    pub commands: Vec<EditorCommand>,
}

/// POST /api/v1/invitations/:id/edits
///
/// Applies the commands in order and persists the result. A failing command
/// rejects the whole batch and nothing is written.
pub async fn apply_edits(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
    Json(batch): Json<EditBatch>,
) -> Result<Json<InvitationResponse>, ApiError> {
    check_id(&id)?;
    let _guard = state
        .save_gate
        .try_acquire(auth.user_id, &id)
        .ok_or(ApiError::SaveInProgress)?;

    let record = load_own(&state, auth.user_id, &id).await?;
    ensure_editable(&auth, &record.data)?;

    let commands = batch.commands.len();
    let next = apply_all(&record.data, batch.commands)?;
    let record = state.invitations.replace(auth.user_id, &id, &next).await?;
    info!(
        invitation_id = %record.id,
        owner_id = %auth.user_id,
        commands,
        "Editor commands applied"
    );
    record_invitation_saved();

    Ok(Json(InvitationResponse::new(record, &state.site.base_url)))
}

/// DELETE /api/v1/invitations/:id
pub async fn delete_invitation(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    check_id(&id)?;
    let _guard = state
        .save_gate
        .try_acquire(auth.user_id, &id)
        .ok_or(ApiError::SaveInProgress)?;

    if !state.invitations.delete(auth.user_id, &id).await? {
        return Err(ApiError::NotFound("Invitation not found".into()));
    }
    info!(invitation_id = %id, owner_id = %auth.user_id, "Invitation deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionBody {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: Suggestion,
    pub title: &'static str,
    pub message: &'static str,
}

/// POST /api/v1/invitations/:id/suggestions
///
/// Asks the suggestion backend for a message. Nothing is persisted; the
/// client applies the result with an `apply_suggestion` edit.
pub async fn suggest(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
    body: Option<Json<SuggestionBody>>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let record = load_own(&state, auth.user_id, &id).await?;
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let request = SuggestionRequest::for_invitation(&record.data, body.prompt.as_deref());

    match state.suggestions.suggest(&request).await {
        Ok(suggestion) => {
            record_suggestion("success");
            Ok(Json(SuggestionResponse {
                suggestion,
                title: SUCCESS_TITLE,
                message: SUCCESS_MESSAGE,
            }))
        }
        Err(e) => {
            record_suggestion("failure");
            warn!(invitation_id = %id, error = %e, "AI suggestion failed");
            Err(e.into())
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTextResponse {
    pub url: String,
    pub text: String,
    pub short_message: String,
    pub compose_url: String,
}

/// GET /api/v1/invitations/:id/share-text
pub async fn share_text(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
) -> Result<Json<ShareTextResponse>, ApiError> {
    let record = load_own(&state, auth.user_id, &id).await?;
    let url = share::public_url(&state.site.base_url, Some(&record.id));
    let text = share::share_text(&record.data, &url);

    Ok(Json(ShareTextResponse {
        compose_url: share::whatsapp_compose_url(&text),
        short_message: share::short_share_message(&record.data, &url),
        text,
        url,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub sink: SinkKind,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareExportResponse {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub image_data_url: String,
}

/// POST /api/v1/invitations/:id/export
///
/// Rasterizes the stored card. `download` answers with the PNG itself,
/// `share` with the fallback plan and the image as a data URL.
pub async fn export_card(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    check_id(&id)?;
    let record = state.invitations.get(auth.user_id, &id).await?;
    let target = record.as_ref().map(|r| {
        let card = render_card(&r.data, Utc::now());
        CaptureTarget::card(views::card_document(&card))
    });

    let mut pipeline =
        ExportPipeline::new(CaptureStrategy::with_font_fallback(state.config.export.pixel_ratio));
    let sink = request.sink;
    let image = match pipeline.run(state.capturer.as_ref(), target.as_ref()).await {
        Ok(image) => image,
        Err(ExportError::TargetMissing) => {
            record_card_export(sink.as_str(), "not_found");
            return Err(ApiError::NotFound("Invitation not found".into()));
        }
        Err(e) => {
            record_card_export(sink.as_str(), "failure");
            return Err(ApiError::export_failed(&e, sink));
        }
    };
    record_card_export(sink.as_str(), "success");

    // `target` is only Some when the record was found.
    let Some(record) = record else {
        return Err(ApiError::NotFound("Invitation not found".into()));
    };

    match sink {
        SinkKind::Download => {
            let file_name = match deliver_download(request.file_name.as_deref(), &image) {
                Delivery::Download { file_name } => file_name,
                other => return Ok(Json(other).into_response()),
            };
            let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
            Ok((
                [
                    (header::CONTENT_TYPE, "image/png".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                image.png,
            )
                .into_response())
        }
        SinkKind::Share => {
            let url = share::public_url(&state.site.base_url, Some(&record.id));
            let delivery = deliver_share(&UnavailableShareSheet, &record.data, &url, &image).await;
            let response = ShareExportResponse {
                delivery,
                image_data_url: format!("data:image/png;base64,{}", STANDARD.encode(&image.png)),
            };
            Ok(Json(response).into_response())
        }
    }
}
