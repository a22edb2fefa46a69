// ============================
// crates/backend-lib/src/directory.rs
// ============================
//! User directory: user records plus the separate password-hash store.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use klubok_common::UserView;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// A registered user. Never carries a password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            phone_number: user.phone_number.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView::from(&user)
    }
}

/// Storage seam for the user directory.
///
/// Implementations must make the uniqueness check and the write of `insert`
/// and `update` atomic with respect to each other.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email (exact match)
    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// Find a user by id
    async fn find_by_id(&self, id: &str) -> Option<User>;

    /// Insert a new user together with its password hash.
    ///
    /// Fails with `Conflict` when the id, username or email is taken.
    async fn insert(&self, user: User, password_hash: String) -> AppResult<User>;

    /// Replace an existing user record.
    ///
    /// Fails with `NotFound` for unknown ids and `Conflict` when the new
    /// username or email belongs to another user.
    async fn update(&self, user: User) -> AppResult<User>;

    /// All users in registration order
    async fn list(&self) -> Vec<User>;

    /// Stored password hash for a user, if any
    async fn password_hash(&self, user_id: &str) -> Option<String>;

    /// Replace the password hash of an existing user
    async fn set_password_hash(&self, user_id: &str, password_hash: String) -> AppResult<()>;

    /// Number of registered users
    async fn len(&self) -> usize;
}

#[derive(Debug, Default)]
struct DirectoryState {
    /// Registration order
    users: Vec<User>,
    passwords: HashMap<String, String>,
}

impl DirectoryState {
    fn conflict_with(&self, candidate: &User) -> Option<&'static str> {
        self.users
            .iter()
            .filter(|u| u.id != candidate.id)
            .find_map(|u| {
                if u.email == candidate.email {
                    Some("email")
                } else if u.username == candidate.username {
                    Some("username")
                } else {
                    None
                }
            })
    }
}

/// In-memory directory guarded by a single lock
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: RwLock<DirectoryState>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Option<User> {
        let state = self.state.read().await;
        state.users.iter().find(|u| u.email == email).cloned()
    }

    async fn find_by_id(&self, id: &str) -> Option<User> {
        let state = self.state.read().await;
        state.users.iter().find(|u| u.id == id).cloned()
    }

    async fn insert(&self, user: User, password_hash: String) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.id == user.id) {
            return Err(AppError::Conflict("User id already exists".to_string()));
        }
        if let Some(field) = state.conflict_with(&user) {
            return Err(AppError::Conflict(format!(
                "A user with this {field} already exists"
            )));
        }
        state.passwords.insert(user.id.clone(), password_hash);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut state = self.state.write().await;
        if let Some(field) = state.conflict_with(&user) {
            return Err(AppError::Conflict(format!(
                "A user with this {field} already exists"
            )));
        }
        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        *slot = user.clone();
        Ok(user)
    }

    async fn list(&self) -> Vec<User> {
        self.state.read().await.users.clone()
    }

    async fn password_hash(&self, user_id: &str) -> Option<String> {
        self.state.read().await.passwords.get(user_id).cloned()
    }

    async fn set_password_hash(&self, user_id: &str, password_hash: String) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        state.passwords.insert(user_id.to_string(), password_hash);
        Ok(())
    }

    async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }
}
