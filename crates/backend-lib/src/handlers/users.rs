// ============================
// crates/backend-lib/src/handlers/users.rs
// ============================
//! User directory and profile endpoints.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use klubok_common::{ProfileResponse, UserView, UsersResponse};

use crate::auth::ProfileUpdate;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::storage::{AvatarStorage, MAX_AVATAR_BYTES};
use crate::AppState;

/// `GET /users`
pub async fn list_users<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedUser(_): AuthenticatedUser,
) -> Json<UsersResponse> {
    let users = state.auth.list_users().await;
    Json(UsersResponse {
        users: users.into_iter().map(UserView::from).collect(),
    })
}

/// `PUT /users/profile`
///
/// Multipart form with optional `username`, `email`, `currentPassword`,
/// `newPassword` text fields and an `avatar` file. Blank fields are left unchanged.
pub async fn update_profile<S: AvatarStorage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut multipart = multipart?;
    let mut update = ProfileUpdate::default();
    let mut avatar: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => update.username = Some(field.text().await?),
            "email" => update.email = Some(field.text().await?),
            "currentPassword" => update.current_password = Some(field.text().await?),
            "newPassword" => update.new_password = Some(field.text().await?),
            "avatar" => {
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    avatar = Some(bytes);
                }
            },
            other => tracing::debug!(field = other, "ignoring unknown profile field"),
        }
    }

    if let Some(bytes) = &avatar {
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(AppError::Validation(format!(
                "Avatar cannot exceed {} MiB",
                MAX_AVATAR_BYTES / (1024 * 1024)
            )));
        }
    }

    // The file is only written once the rest of the edit has been accepted
    let mut updated = state.auth.update_profile(&user.id, update).await?;
    if let Some(bytes) = avatar {
        let reference = state.storage.store_avatar(&updated.id, &bytes).await?;
        let avatar_only = ProfileUpdate {
            avatar: Some(reference),
            ..ProfileUpdate::default()
        };
        updated = state.auth.update_profile(&updated.id, avatar_only).await?;
    }
    Ok(Json(ProfileResponse {
        user: updated.into(),
    }))
}

/// `GET /avatars/{file}`
pub async fn avatar<S: AvatarStorage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let user_id = file
        .strip_suffix(".jpg")
        .ok_or_else(|| AppError::NotFound("Avatar not found".to_string()))?;
    let bytes = state
        .storage
        .read_avatar(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Avatar not found".to_string()))?;
    Ok(([(CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}
