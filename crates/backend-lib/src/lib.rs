// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the Klubok calling service.
//!
//! Two responsibilities make up the server: the session authenticator
//! (`auth`), which checks passwords and issues signed session tokens, and
//! the credential issuer (`media`), which turns a verified identity into a
//! room-scoped credential for the real-time media provider.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod media;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{token_generator, AuthRateLimiter, AuthService, DefaultAuth, SessionTokens};
use crate::config::Settings;
use crate::directory::{InMemoryUserRepository, UserRepository};
use crate::media::CredentialIssuer;
use crate::middleware::RateLimiter;
use crate::stats::CallStatsRegistry;
use crate::storage::FlatFileStorage;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Session authenticator
    pub auth: Arc<dyn AuthService>,
    /// User directory
    pub users: Arc<dyn UserRepository>,
    /// Room credential issuer
    pub credentials: Arc<CredentialIssuer>,
    /// Call statistics
    pub stats: Arc<CallStatsRegistry>,
    /// Configuration settings
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
    /// Request rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Login rate limiter
    pub auth_rate_limiter: Arc<AuthRateLimiter>,
}

impl<S> AppState<S> {
    /// Create a new application state with an empty in-memory directory
    pub fn new(storage: S, config: &Settings) -> anyhow::Result<Self> {
        Self::with_repository(storage, config, Arc::new(InMemoryUserRepository::new()))
    }

    /// Create a new application state over an existing user directory
    pub fn with_repository(
        storage: S,
        config: &Settings,
        users: Arc<dyn UserRepository>,
    ) -> anyhow::Result<Self> {
        let secret = match &config.auth.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!(
                    "auth.jwt_secret is not set; using a random key, sessions end on restart"
                );
                token_generator::generate_secret()
            },
        };
        let tokens = SessionTokens::new(
            secret.as_bytes(),
            Duration::from_secs(config.auth.session_ttl_secs),
        );
        let auth = Arc::new(DefaultAuth::new(
            users.clone(),
            tokens,
            config.auth.scrypt,
            config.auth.password.clone(),
        )?);

        Ok(Self {
            auth,
            users,
            credentials: Arc::new(CredentialIssuer::from_settings(&config.media)),
            stats: Arc::new(CallStatsRegistry::default()),
            settings: Arc::new(config.clone()),
            storage,
            rate_limiter: Arc::new(RateLimiter::new(
                Duration::from_secs(config.rate_limit.window_secs),
                config.rate_limit.max_requests,
            )),
            auth_rate_limiter: Arc::new(AuthRateLimiter::new(
                config.auth.login_max_attempts,
                Duration::from_secs(config.auth.login_lockout_secs),
            )),
        })
    }

    /// Replace the credential issuer
    pub fn with_credential_issuer(mut self, issuer: CredentialIssuer) -> Self {
        self.credentials = Arc::new(issuer);
        self
    }

    /// Seed the demo accounts when enabled in the settings
    pub async fn seed_if_enabled(&self) -> anyhow::Result<usize> {
        if !self.settings.auth.seed_test_accounts {
            return Ok(0);
        }
        let added =
            seed::seed_test_accounts(self.users.as_ref(), &self.settings.auth.scrypt).await?;
        ::metrics::gauge!(crate::metrics::USERS_TOTAL).set(self.users.len().await as f64);
        Ok(added)
    }
}

impl AppState<FlatFileStorage> {
    /// Create application state with flat-file storage under the configured data dir
    pub fn from_settings(config: &Settings) -> anyhow::Result<Self> {
        let storage = FlatFileStorage::new(&config.storage.data_dir)?;
        Self::new(storage, config)
    }
}
