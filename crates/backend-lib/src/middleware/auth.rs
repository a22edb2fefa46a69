//! Bearer-token authentication extractor.
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::directory::User;
use crate::error::AppError;
use crate::AppState;

/// The user behind a valid `Authorization: Bearer` header
///
/// Rejects with 401 when the header is missing, malformed, or carries an
/// invalid or expired token, and with 404 when the user no longer exists.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<Arc<AppState<S>>> for AuthenticatedUser
where
    S: Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Auth("Authorization required".to_string()))?;
        let user = state.auth.resolve(token).await.inspect_err(|e| {
            tracing::warn!(error = %e, "bearer authentication failed");
        })?;
        Ok(AuthenticatedUser(user))
    }
}
