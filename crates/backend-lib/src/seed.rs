// ============================
// crates/backend-lib/src/seed.rs
// ============================
//! Demo accounts for local development.
use chrono::Utc;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::config::ScryptSettings;
use crate::directory::{User, UserRepository};
use crate::error::{AppError, AppResult};

/// Administrator account
pub const ADMIN_EMAIL: &str = "admin@klubok.com";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Password shared by the demo users
pub const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: [(&str, &str, &str); 2] = [
    ("alice", "alice@klubok.com", "+666-200-1001"),
    ("bob", "bob@klubok.com", "+666-200-1002"),
];

/// Insert the demo accounts that are not present yet. Returns how many were added.
pub async fn seed_test_accounts(
    users: &dyn UserRepository,
    cost: &ScryptSettings,
) -> AppResult<usize> {
    let cost = *cost;
    let (admin_hash, demo_hash) = tokio::task::spawn_blocking(move || {
        Ok::<_, anyhow::Error>((
            hash_password(ADMIN_PASSWORD, &cost)?,
            hash_password(DEMO_PASSWORD, &cost)?,
        ))
    })
    .await?
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let accounts = std::iter::once((ADMIN_USERNAME, ADMIN_EMAIL, "+666-100-1000", admin_hash))
        .chain(
            DEMO_USERS
                .iter()
                .map(|(name, email, phone)| (*name, *email, *phone, demo_hash.clone())),
        );

    let mut added = 0;
    for (username, email, phone, hash) in accounts {
        if users.find_by_email(email).await.is_some() {
            continue;
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            avatar: None,
            phone_number: Some(phone.to_string()),
            created_at: Utc::now(),
        };
        match users.insert(user, hash).await {
            Ok(_) => added += 1,
            // Someone registered the handle first; leave their account alone
            Err(AppError::Conflict(reason)) => {
                tracing::warn!(email, %reason, "skipping demo account");
            },
            Err(e) => return Err(e),
        }
    }

    if added > 0 {
        tracing::warn!(added, "seeded demo accounts; disable auth.seed_test_accounts in production");
    }
    Ok(added)
}
