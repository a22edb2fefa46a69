// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, which is used for authentication
use super::SessionClaims;
use crate::directory::User;
use crate::error::AppResult;
use async_trait::async_trait;

/// Changes requested through the profile form. Blank fields keep the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    /// New avatar reference, already stored
    pub avatar: Option<String>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user. `Conflict` when the email or username is taken.
    async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User>;

    /// Check credentials. Unknown email and wrong password both yield `None`.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>>;

    /// Issue a session token for `user_id`
    fn issue_token(&self, user_id: &str) -> AppResult<String>;

    /// Decode a session token; `None` unless valid and unexpired
    fn verify_token(&self, token: &str) -> Option<SessionClaims>;

    /// Verify a token and load its user
    async fn resolve(&self, token: &str) -> AppResult<User>;

    /// All registered users
    async fn list_users(&self) -> Vec<User>;

    /// Apply a profile edit for `user_id`
    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> AppResult<User>;
}
