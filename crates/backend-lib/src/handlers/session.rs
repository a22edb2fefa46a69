// ============================
// crates/backend-lib/src/handlers/session.rs
// ============================
//! Login and registration.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use klubok_common::{LoginRequest, RegisterRequest, SessionResponse};
use metrics::counter;

use crate::error::AppError;
use crate::metrics as keys;
use crate::middleware::client_key;
use crate::AppState;

/// `POST /login`
///
/// Unknown email and wrong password produce the same 401. Clients that keep
/// failing are locked out for the configured period.
pub async fn login<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(request) = payload?;
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let client = client_key(&headers);
    if !state.auth_rate_limiter.check_rate_limit(&client) {
        counter!(keys::LOGIN_LOCKED_OUT).increment(1);
        tracing::warn!(client = %client, "login attempt while locked out");
        return Err(AppError::AuthRateLimited);
    }

    match state
        .auth
        .authenticate(request.email.trim(), &request.password)
        .await?
    {
        Some(user) => {
            state.auth_rate_limiter.record_success(&client);
            let token = state.auth.issue_token(&user.id)?;
            tracing::info!(user_id = %user.id, username = %user.username, "login succeeded");
            Ok(Json(SessionResponse {
                user: user.into(),
                token,
            }))
        },
        None => {
            state.auth_rate_limiter.record_failed_attempt(&client);
            tracing::warn!(client = %client, "login failed");
            Err(AppError::InvalidCredentials)
        },
    }
}

/// `POST /register`
pub async fn register<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let Json(request) = payload?;
    let user = state
        .auth
        .register(&request.username, &request.email, &request.password)
        .await?;
    let token = state.auth.issue_token(&user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: user.into(),
            token,
        }),
    ))
}
