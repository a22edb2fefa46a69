// ==============================
// tests/integration/token_tests.rs
// ==============================
//! Room credential issuance through `POST /token`
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use klubok_backend_lib::auth::SessionTokens;
use klubok_backend_lib::media::LiveKitClaims;
use klubok_backend_lib::router::create_router;
use klubok_backend_lib::seed::{ADMIN_EMAIL, ADMIN_PASSWORD, DEMO_PASSWORD};
use klubok_common::{ErrorBody, TokenResponse};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::test_utils::{
    json_request, login, send, setup_with_settings, test_app, test_settings, TEST_JWT_SECRET,
    TEST_MEDIA_KEY, TEST_MEDIA_SECRET, TEST_WS_URL,
};

fn decode_room_token(token: &str) -> LiveKitClaims {
    decode::<LiveKitClaims>(
        token,
        &DecodingKey::from_secret(TEST_MEDIA_SECRET.as_bytes()),
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .unwrap()
    .claims
}

#[tokio::test]
async fn test_login_then_join_room() {
    let (app, _state, _temp_dir) = test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body): (_, TokenResponse) = send(
        &app,
        json_request(
            Method::POST,
            "/token",
            &json!({ "room": "call-video-abcd12" }),
            Some(&session),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ws_url.starts_with("wss://"));
    assert_eq!(body.ws_url, TEST_WS_URL);

    let claims = decode_room_token(&body.token);
    assert_eq!(claims.iss, TEST_MEDIA_KEY);
    assert_eq!(claims.sub, "admin");
    assert_eq!(claims.name, "admin");
    assert_eq!(claims.video.room, "call-video-abcd12");
    assert!(claims.video.room_join);
}

#[tokio::test]
async fn test_any_non_blank_room_name_is_accepted() {
    let (app, _state, _temp_dir) = test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for room in ["Team Sync", "комната", "room#1"] {
        let (status, body): (_, TokenResponse) = send(
            &app,
            json_request(Method::POST, "/token", &json!({ "room": room }), Some(&session)),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "room {room:?}");
        assert_eq!(decode_room_token(&body.token).video.room, room);
    }
}

#[tokio::test]
async fn test_client_identity_is_ignored() {
    let (app, _state, _temp_dir) = test_app().await;
    let session = login(&app, "bob@klubok.com", DEMO_PASSWORD).await;

    let (status, body): (_, TokenResponse) = send(
        &app,
        json_request(
            Method::POST,
            "/token",
            &json!({ "room": "room-1", "identity": "admin", "name": "Definitely Admin" }),
            Some(&session),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let claims = decode_room_token(&body.token);
    assert_eq!(claims.sub, "bob");
    assert_eq!(claims.name, "bob");
}

#[tokio::test]
async fn test_token_requires_session() {
    let (app, _state, _temp_dir) = test_app().await;

    let (status, error): (_, ErrorBody) = send(
        &app,
        json_request(Method::POST, "/token", &json!({ "room": "room-1" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error.error.code, "AUTH_001");
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let (app, state, _temp_dir) = test_app().await;
    let admin = state.users.find_by_email(ADMIN_EMAIL).await.unwrap();

    let tokens = SessionTokens::new(
        TEST_JWT_SECRET.as_bytes(),
        std::time::Duration::from_secs(60),
    );
    let stale = tokens
        .issue_at(&admin.id, Utc::now() - Duration::seconds(120))
        .unwrap();

    let (status, _): (_, Value) = send(
        &app,
        json_request(Method::POST, "/token", &json!({ "room": "room-1" }), Some(&stale)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_room_is_bad_request() {
    let (app, _state, _temp_dir) = test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for body in [json!({}), json!({ "room": "" }), json!({ "room": "   " })] {
        let (status, error): (_, ErrorBody) =
            send(&app, json_request(Method::POST, "/token", &body, Some(&session))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.code, "VAL_001");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _state, _temp_dir) = test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {session}"))
        .body(Body::from("{\"room\": "))
        .unwrap();
    let (status, error): (_, ErrorBody) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error.code, "VAL_001");
}

#[tokio::test]
async fn test_unconfigured_media_provider() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = test_settings(&temp_dir);
    settings.media.api_secret = None;
    let app = create_router(setup_with_settings(&settings).await);
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, error): (_, ErrorBody) = send(
        &app,
        json_request(Method::POST, "/token", &json!({ "room": "room-1" }), Some(&session)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.error.code, "CFG_001");
}
