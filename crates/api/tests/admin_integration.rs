//! Integration tests for administrator tools.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_token, create_authenticated_user, create_invitation, get_request_with_auth,
    json_request_with_auth, parse_response_body, send, spawn_app,
};
use serde_json::{json, Value};

fn expiry_uri(id: &str) -> String {
    format!("/api/v1/admin/invitations/{}/edit-expiry", id)
}

async fn owner_save_status(app: &common::TestApp, id: &str, token: &str) -> StatusCode {
    send(
        app,
        json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/invitations/{}", id),
            json!({ "venueCity": "नाशिक" }),
            token,
        ),
    )
    .await
    .status()
}

#[tokio::test]
async fn test_admin_lists_every_owner() {
    let app = spawn_app().await;
    let first = create_authenticated_user(&app).await;
    let second = create_authenticated_user(&app).await;
    let a = create_invitation(&app, &first.access_token).await;
    let b = create_invitation(&app, &second.access_token).await;
    let admin = admin_token(&app).await;

    let response = send(&app, get_request_with_auth("/api/v1/admin/invitations", &admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["id"].as_str())
        .collect();
    assert!(ids.contains(&a.as_str()));
    assert!(ids.contains(&b.as_str()));
}

#[tokio::test]
async fn test_customer_cannot_use_admin_routes() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;

    let response = send(
        &app,
        get_request_with_auth("/api/v1/admin/invitations", &user.access_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &expiry_uri(&id),
            json!({ "editExpiryDate": null }),
            &user.access_token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_edit_expiry_locks_and_unlocks() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;
    let admin = admin_token(&app).await;

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &expiry_uri(&id),
            json!({ "editExpiryDate": "2000-01-01" }),
            &admin,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["data"]["editExpiryDate"], "2000-01-01");
    assert_eq!(
        owner_save_status(&app, &id, &user.access_token).await,
        StatusCode::FORBIDDEN
    );

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &expiry_uri(&id),
            json!({ "editExpiryDate": null }),
            &admin,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        owner_save_status(&app, &id, &user.access_token).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_future_expiry_keeps_editing_open() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;
    let admin = admin_token(&app).await;

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &expiry_uri(&id),
            json!({ "editExpiryDate": { "seconds": 4102444800i64, "nanoseconds": 0 } }),
            &admin,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        owner_save_status(&app, &id, &user.access_token).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_uninterpretable_expiry_is_rejected() {
    let app = spawn_app().await;
    let user = create_authenticated_user(&app).await;
    let id = create_invitation(&app, &user.access_token).await;
    let admin = admin_token(&app).await;

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &expiry_uri(&id),
            json!({ "editExpiryDate": "next tuesday" }),
            &admin,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        get_request_with_auth(&format!("/api/v1/invitations/{}", id), &user.access_token),
    )
    .await;
    let body = parse_response_body(response).await;
    assert_eq!(body["data"]["editExpiryDate"], Value::Null);
}

#[tokio::test]
async fn test_edit_expiry_unknown_invitation() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let response = send(
        &app,
        json_request_with_auth(
            Method::PUT,
            &expiry_uri("abcdefghij"),
            json!({ "editExpiryDate": null }),
            &admin,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
