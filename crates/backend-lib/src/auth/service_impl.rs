use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use metrics::{counter, gauge};
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::token_generator::{generate_phone_number, generate_secret};
use super::{AuthService, ProfileUpdate, SessionClaims, SessionTokens};
use crate::config::{PasswordRequirements, ScryptSettings};
use crate::directory::{User, UserRepository};
use crate::error::{AppError, AppResult};
use crate::metrics as keys;
use crate::validation::{validate_email, validate_password, validate_username};

/// Session authenticator backed by a `UserRepository`
pub struct DefaultAuth {
    users: Arc<dyn UserRepository>,
    tokens: SessionTokens,
    cost: ScryptSettings,
    requirements: PasswordRequirements,
    /// Verified against when the email is unknown so both failure paths cost the same
    decoy_hash: String,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: SessionTokens,
        cost: ScryptSettings,
        requirements: PasswordRequirements,
    ) -> anyhow::Result<Self> {
        let decoy_hash = hash_password(&generate_secret(), &cost)?;
        Ok(Self {
            users,
            tokens,
            cost,
            requirements,
            decoy_hash,
        })
    }

    async fn hash_blocking(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash_password(&password, &cost))
            .await?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn verify_blocking(hash: String, password: &str) -> AppResult<bool> {
        let password = password.to_string();
        Ok(tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let username = validate_username(username)?;
        let email = validate_email(email)?;
        validate_password(password, &self.requirements)?;

        // Cheap rejection before paying for the hash; `insert` re-checks atomically
        if self.users.find_by_email(email).await.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_blocking(password).await?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            avatar: None,
            phone_number: Some(generate_phone_number()),
            created_at: Utc::now(),
        };

        let user = self.users.insert(user, password_hash).await?;
        counter!(keys::USER_REGISTERED).increment(1);
        gauge!(keys::USERS_TOTAL).set(self.users.len().await as f64);
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let user = self.users.find_by_email(email.trim()).await;
        let stored = match &user {
            Some(u) => self.users.password_hash(&u.id).await,
            None => None,
        };

        let known = stored.is_some();
        let hash = stored.unwrap_or_else(|| self.decoy_hash.clone());
        let matches = Self::verify_blocking(hash, password).await?;

        if matches && known {
            counter!(keys::LOGIN_SUCCEEDED).increment(1);
            Ok(user)
        } else {
            counter!(keys::LOGIN_FAILED).increment(1);
            Ok(None)
        }
    }

    fn issue_token(&self, user_id: &str) -> AppResult<String> {
        self.tokens.issue(user_id)
    }

    fn verify_token(&self, token: &str) -> Option<SessionClaims> {
        self.tokens.verify(token)
    }

    async fn resolve(&self, token: &str) -> AppResult<User> {
        let claims = self
            .verify_token(token)
            .ok_or_else(|| AppError::Auth("Invalid or expired token".to_string()))?;
        self.users
            .find_by_id(&claims.user_id)
            .await
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn list_users(&self) -> Vec<User> {
        self.users.list().await
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> AppResult<User> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(username) = non_blank(update.username) {
            user.username = validate_username(&username)?.to_string();
        }
        if let Some(email) = non_blank(update.email) {
            user.email = validate_email(&email)?.to_string();
        }

        let mut new_hash = None;
        if let Some(new_password) = non_blank(update.new_password) {
            validate_password(&new_password, &self.requirements)?;
            let current = non_blank(update.current_password).ok_or_else(|| {
                AppError::Validation(
                    "Current password is required to set a new password".to_string(),
                )
            })?;
            let stored = self.users.password_hash(&user.id).await.ok_or_else(|| {
                AppError::Validation("Current password is incorrect".to_string())
            })?;
            if !Self::verify_blocking(stored, &current).await? {
                return Err(AppError::Validation(
                    "Current password is incorrect".to_string(),
                ));
            }
            new_hash = Some(self.hash_blocking(&new_password).await?);
        }

        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }

        let user = self.users.update(user).await?;
        if let Some(hash) = new_hash {
            self.users.set_password_hash(&user.id, hash).await?;
            tracing::info!(user_id = %user.id, "password changed");
        }
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}
