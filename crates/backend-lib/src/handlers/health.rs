//! Liveness check.
use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// `GET /health`
pub async fn health<S: Send + Sync + 'static>(State(state): State<Arc<AppState<S>>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "mediaConfigured": state.credentials.is_configured(),
    }))
}
