// ============================
// crates/backend-lib/src/handlers/token.rs
// ============================
//! Room credential endpoint.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use klubok_common::{TokenRequest, TokenResponse};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::AppState;

/// `POST /token`
///
/// The participant identity and display name always come from the session;
/// `identity` and `name` in the body are ignored.
pub async fn issue_room_token<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(request) = payload?;
    if let Some(claimed) = request
        .identity
        .as_deref()
        .filter(|claimed| *claimed != user.username)
    {
        tracing::debug!(claimed, username = %user.username, "ignoring client-supplied identity");
    }

    let credential = state.credentials.issue_room_credential(
        &request.room,
        &user.username,
        Some(&user.username),
    )?;

    Ok(Json(TokenResponse {
        token: credential.token,
        ws_url: credential.ws_url,
    }))
}
