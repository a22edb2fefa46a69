// ==================================
// tests/integration/stats_flow_tests.rs
// ==================================
use axum::http::{Method, StatusCode};
use klubok_backend_lib::seed::{ADMIN_EMAIL, ADMIN_PASSWORD};
use klubok_backend_lib::stats::MAX_CALL_DURATION;
use klubok_common::{CallType, ErrorBody, RecordCallResponse, StatsResponse};
use serde_json::json;

use crate::test_utils::{empty_request, json_request, login, send, test_app};

#[tokio::test]
async fn test_record_and_read_stats() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, empty): (_, StatsResponse) =
        send(&app, empty_request(Method::GET, "/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty.stats.total_calls, 0);
    assert!(empty.recent_calls.is_empty());

    let (status, recorded): (_, RecordCallResponse) = send(
        &app,
        json_request(
            Method::POST,
            "/stats",
            &json!({ "type": "video", "participants": ["admin", "alice"], "duration": 12 }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(recorded.success);
    assert_eq!(recorded.call.call_type, CallType::Video);

    send::<RecordCallResponse>(
        &app,
        json_request(
            Method::POST,
            "/stats",
            &json!({ "type": "audio", "participants": ["bob"], "duration": 3 }),
            Some(&token),
        ),
    )
    .await;

    let (_, body): (_, StatsResponse) =
        send(&app, empty_request(Method::GET, "/stats", Some(&token))).await;
    assert_eq!(body.stats.total_calls, 2);
    assert_eq!(body.stats.video_calls, 1);
    assert_eq!(body.stats.audio_calls, 1);
    assert_eq!(body.stats.total_duration, 15);
    assert_eq!(body.stats.average_duration, 8);
    assert_eq!(body.recent_calls[0].call_type, CallType::Audio);
    assert_eq!(body.recent_calls[1].id, recorded.call.id);
}

#[tokio::test]
async fn test_unknown_call_type_is_rejected() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, error): (_, ErrorBody) = send(
        &app,
        json_request(
            Method::POST,
            "/stats",
            &json!({ "type": "hologram" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error.code, "VAL_001");
}

#[tokio::test]
async fn test_stats_require_session() {
    let (app, _state, _temp_dir) = test_app().await;

    let (status, error): (_, ErrorBody) =
        send(&app, empty_request(Method::GET, "/stats", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error.error.code, "AUTH_001");

    let (status, _): (_, ErrorBody) = send(
        &app,
        json_request(Method::POST, "/stats", &json!({ "type": "audio" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_duration_is_rejected_and_not_counted() {
    let (app, _state, _temp_dir) = test_app().await;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for _ in 0..2 {
        let (status, error): (_, ErrorBody) = send(
            &app,
            json_request(
                Method::POST,
                "/stats",
                &json!({ "type": "video", "duration": u64::MAX }),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.code, "VAL_001");
    }

    let (status, _): (_, RecordCallResponse) = send(
        &app,
        json_request(
            Method::POST,
            "/stats",
            &json!({ "type": "video", "duration": MAX_CALL_DURATION }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body): (_, StatsResponse) =
        send(&app, empty_request(Method::GET, "/stats", Some(&token))).await;
    assert_eq!(body.stats.total_calls, 1);
    assert_eq!(body.stats.total_duration, MAX_CALL_DURATION);
}
