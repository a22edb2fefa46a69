//! Call statistics endpoints.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use klubok_common::{RecordCallRequest, RecordCallResponse, StatsResponse};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::stats::MAX_CALL_DURATION;
use crate::AppState;

/// `GET /stats`
pub async fn get_stats<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedUser(_): AuthenticatedUser,
) -> Json<StatsResponse> {
    let snapshot = state.stats.snapshot();
    Json(StatsResponse {
        stats: snapshot.stats,
        recent_calls: snapshot.recent_calls,
    })
}

/// `POST /stats`
pub async fn record_call<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<RecordCallRequest>, JsonRejection>,
) -> Result<Json<RecordCallResponse>, AppError> {
    let Json(request) = payload?;
    if request.duration > MAX_CALL_DURATION {
        return Err(AppError::Validation(format!(
            "Call duration cannot exceed {MAX_CALL_DURATION} minutes"
        )));
    }
    let call = state
        .stats
        .record(request.call_type, request.participants, request.duration);
    tracing::debug!(
        call_id = %call.id,
        reported_by = %user.username,
        duration = call.duration,
        "call recorded"
    );

    Ok(Json(RecordCallResponse {
        success: true,
        call,
    }))
}
