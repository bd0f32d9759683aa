//! Unauthenticated invitation views, reached through the shareable link.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use domain::models::InvitationData;
use domain::services::{metadata, render_card, share, InvitationResolver, LookupError, PageViewLookup};
use maud::Markup;
use serde::Serialize;
use shared::crypto::etag_for;

use crate::app::AppState;
use crate::error::{ApiError, RETRY_MESSAGE};
use crate::middleware::metrics::record_invitation_lookup;
use crate::views;

fn lookup_outcome(result: &Result<impl Sized, LookupError>) -> &'static str {
    match result {
        Ok(_) => "found",
        Err(LookupError::NotFound) => "not_found",
        Err(_) => "error",
    }
}

#[derive(Debug, Serialize)]
pub struct PublicInvitationResponse<'a> {
    pub id: &'a str,
    pub data: &'a InvitationData,
}

/// GET /api/v1/public/invitations/:id
///
/// Two-step lookup through the public index. Honors `If-None-Match`.
pub async fn public_invitation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let resolver = InvitationResolver::new(&*state.invitations, &*state.invitations);
    let result = resolver.resolve(&id).await;
    record_invitation_lookup(lookup_outcome(&result));
    let record = result?;

    let body = serde_json::to_vec(&PublicInvitationResponse {
        id: &record.id,
        data: &record.data,
    })
    .map_err(|e| ApiError::Internal(format!("Failed to encode invitation: {}", e)))?;
    let etag = etag_for(&body);

    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == etag);
    if unchanged {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response())
}

/// GET /assets/card.js
pub async fn card_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        views::script::CARD_SCRIPT,
    )
}

/// GET /invitation/:id
///
/// Server-rendered card. Metadata and body share one memoized lookup.
pub async fn invitation_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Markup) {
    let resolver = InvitationResolver::new(&*state.invitations, &*state.invitations);
    let lookup = PageViewLookup::new(resolver, id.as_str());
    let page_url = share::public_url(&state.site.base_url, Some(&id));

    let meta = match lookup.get().await {
        Ok(record) => metadata::for_invitation(&record.data, &page_url, &state.site),
        Err(LookupError::NotFound) => metadata::not_found(),
        Err(_) => metadata::site_default(&state.site),
    };

    let result = lookup.get().await;
    record_invitation_lookup(lookup_outcome(result));

    match result {
        Ok(record) => {
            let card = render_card(&record.data, Utc::now());
            let text = share::short_share_message(&record.data, &page_url);
            let compose_url = share::whatsapp_compose_url(&text);
            (
                StatusCode::OK,
                views::invitation_page(&meta, &card, &compose_url),
            )
        }
        Err(LookupError::NotFound) => (StatusCode::NOT_FOUND, views::not_found_page(&meta)),
        Err(LookupError::PermissionDenied(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            views::error_page(&meta, RETRY_MESSAGE),
        ),
        Err(LookupError::Unavailable(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            views::error_page(&meta, RETRY_MESSAGE),
        ),
    }
}
