//! Integration tests for the unauthenticated invitation views.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use common::{
    create_authenticated_user, create_invitation, get_request, json_request_with_auth,
    parse_response_body, response_text, send, spawn_app,
};
use domain::models::{InvitationData, PublicInvitation};
use persistence::InvitationStore;
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// JSON lookup
// ============================================================================

#[tokio::test]
async fn test_public_lookup_resolves_through_index() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;

    let response = send(&app, get_request(&format!("/api/v1/public/invitations/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ETAG).is_some());

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["data"]["groomName"], "सुमित पवार");
}

#[tokio::test]
async fn test_public_lookup_honors_if_none_match() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;
    let uri = format!("/api/v1/public/invitations/{}", id);

    let response = send(&app, get_request(&uri)).await;
    let etag = response.headers()[header::ETAG].to_str().unwrap().to_string();

    let request = Request::builder()
        .uri(&uri)
        .header(header::IF_NONE_MATCH, &etag)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

    send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/invitations/{}", id),
            json!({ "venueName": "शुभमंगल कार्यालय" }),
            &user.access_token,
        ),
    )
    .await;

    let request = Request::builder()
        .uri(&uri)
        .header(header::IF_NONE_MATCH, &etag)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_lookup_unknown_id() {
    let app = spawn_app().await;

    let response = send(&app, get_request("/api/v1/public/invitations/abcdefghij")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_record_without_owner_is_not_found() {
    let app = spawn_app().await;
    app.invitations
        .insert_public_record(PublicInvitation {
            id: "Legacy1234".to_string(),
            owner_id: None,
            updated_at: Utc::now(),
        })
        .await;

    let response = send(&app, get_request("/api/v1/public/invitations/Legacy1234")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_invitation_disappears_from_public_view() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;

    let response = send(
        &app,
        common::delete_request_with_auth(&format!("/api/v1/invitations/{}", id), &user.access_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get_request(&format!("/api/v1/public/invitations/{}", id))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Server-rendered page
// ============================================================================

#[tokio::test]
async fn test_invitation_page_renders_card_and_metadata() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;

    let response = send(&app, get_request(&format!("/invitation/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response_text(response).await;
    assert!(html.contains(r#"id="invitation-card""#));
    assert!(html.contains(r#"property="og:title""#));
    assert!(html.contains(r#"name="twitter:card""#));
    assert!(html.contains("प्रेरणा पाटील"));
    assert!(html.contains("https://wa.me/?text="));
}

#[tokio::test]
async fn test_invitation_page_escapes_user_content() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/invitations/{}", id),
            json!({ "brideName": "<script>alert(1)</script>" }),
            &user.access_token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/invitations/{}", id),
            json!({ "venueMapLink": "javascript:alert(1)" }),
            &user.access_token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get_request(&format!("/invitation/{}", id))).await;
    let html = response_text(response).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("javascript:alert"));
}

#[tokio::test]
async fn test_page_ignores_unsafe_values_already_stored() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;
    let owner = Uuid::parse_str(&user.user_id).unwrap();

    // Written straight to the store, as a document saved before values were checked.
    let data: InvitationData = serde_json::from_value(json!({
        "brideName": "प्रेरणा पाटील",
        "venueMapLink": "javascript:alert(1)",
        "colors": { "place": "red;position:fixed;inset:0;background:url(https://evil.example/x)" },
        "topBanner": {
            "enabled": true,
            "text": "शुभ विवाह",
            "color": "red;background:url(https://evil.example/b)"
        }
    }))
    .unwrap();
    app.invitations.replace(owner, &id, &data).await.unwrap();

    let response = send(&app, get_request(&format!("/invitation/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("top-banner"));
    assert!(!html.contains("evil.example"));
    assert!(!html.contains("position:fixed"));
    assert!(!html.contains("javascript:alert"));
}

#[tokio::test]
async fn test_invitation_page_loads_card_script_under_csp() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;

    let response = send(&app, get_request(&format!("/invitation/{}", id))).await;
    let csp = response.headers()[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap()
        .to_string();
    assert!(csp.contains("script-src 'self'"));
    let html = response_text(response).await;
    assert!(html.contains(r#"<script src="/assets/card.js" defer></script>"#));

    let response = send(&app, get_request("/assets/card.js")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
    let script = response_text(response).await;
    assert!(script.contains("setInterval"));
}

#[tokio::test]
async fn test_missing_invitation_page() {
    let app = spawn_app().await;

    let response = send(&app, get_request("/invitation/abcdefghij")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let html = response_text(response).await;
    assert!(html.contains("Invitation Not Found"));
    assert!(html.contains("निमंत्रण सापडले नाही"));
}

#[tokio::test]
async fn test_malformed_id_page_is_not_found() {
    let app = spawn_app().await;

    let response = send(&app, get_request("/invitation/bad%20id")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
