// ================================
// tests/integration/profile_tests.rs
// ================================
//! Profile edits through `PUT /users/profile`
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use klubok_backend_lib::seed::{ADMIN_EMAIL, ADMIN_PASSWORD, DEMO_PASSWORD};
use klubok_common::{ErrorBody, ProfileResponse};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::test_utils::{empty_request, json_request, login, send, test_app};

const BOUNDARY: &str = "klubok-test-boundary";

fn profile_request(fields: &[(&str, &str)], avatar: Option<&[u8]>, token: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = avatar {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(Method::PUT)
        .uri("/users/profile")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_rename_keeps_blank_fields() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, "alice@klubok.com", DEMO_PASSWORD).await;

    let (status, body): (_, ProfileResponse) = send(
        &app,
        profile_request(&[("username", "alice_w"), ("email", "")], None, Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.user.username, "alice_w");
    assert_eq!(body.user.email, "alice@klubok.com");
}

#[tokio::test]
async fn test_rename_to_taken_username_conflicts() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, "alice@klubok.com", DEMO_PASSWORD).await;

    let (status, error): (_, ErrorBody) =
        send(&app, profile_request(&[("username", "bob")], None, Some(&token))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error.error.code, "CONFLICT_001");
}

#[tokio::test]
async fn test_password_change_needs_current_password() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _): (_, ErrorBody) = send(
        &app,
        profile_request(
            &[("currentPassword", "not-it"), ("newPassword", "brand-new-pass")],
            None,
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _): (_, ProfileResponse) = send(
        &app,
        profile_request(
            &[("currentPassword", ADMIN_PASSWORD), ("newPassword", "brand-new-pass")],
            None,
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _): (_, Value) = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            &json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    login(&app, ADMIN_EMAIL, "brand-new-pass").await;
}

#[tokio::test]
async fn test_avatar_upload_is_served_back() {
    let (app, _state, temp_dir) = test_app().await;
    let token = login(&app, "bob@klubok.com", DEMO_PASSWORD).await;
    let image = b"\xFF\xD8\xFF\xE0 not really a jpeg";

    let (status, body): (_, ProfileResponse) =
        send(&app, profile_request(&[], Some(image), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let reference = body.user.avatar.unwrap();
    assert_eq!(reference, format!("/avatars/{}.jpg", body.user.id));
    assert!(temp_dir
        .path()
        .join("avatars")
        .join(format!("{}.jpg", body.user.id))
        .exists());

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, &reference, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], &image[..]);
}

#[tokio::test]
async fn test_rejected_edit_leaves_avatar_untouched() {
    let (app, state, temp_dir) = test_app().await;
    let token = login(&app, "bob@klubok.com", DEMO_PASSWORD).await;
    let avatars = temp_dir.path().join("avatars");

    let (status, _): (_, ErrorBody) = send(
        &app,
        profile_request(&[("username", "alice")], Some(b"new face"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _): (_, ErrorBody) = send(
        &app,
        profile_request(
            &[("currentPassword", "not-it"), ("newPassword", "brand-new-pass")],
            Some(b"new face"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(std::fs::read_dir(&avatars).unwrap().count(), 0);
    let bob = state.users.find_by_email("bob@klubok.com").await.unwrap();
    assert_eq!(bob.username, "bob");
    assert!(bob.avatar.is_none());
}

#[tokio::test]
async fn test_empty_avatar_field_is_ignored() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, "bob@klubok.com", DEMO_PASSWORD).await;

    let (status, body): (_, ProfileResponse) =
        send(&app, profile_request(&[], Some(b""), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.user.avatar.is_none());
}

#[tokio::test]
async fn test_profile_requires_session() {
    let (app, _state, _temp_dir) = test_app().await;
    let (status, _): (_, ErrorBody) =
        send(&app, profile_request(&[("username", "mallory")], None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
