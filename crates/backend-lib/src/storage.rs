// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs as tokio_fs;

use crate::error::AppError;

/// Largest avatar accepted, in bytes
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Trait for storage backends
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Store an avatar image for a user and return its public reference
    async fn store_avatar(&self, user_id: &str, bytes: &[u8]) -> Result<String, AppError>;

    /// Read a stored avatar, if any
    async fn read_avatar(&self, user_id: &str) -> Result<Option<Vec<u8>>, AppError>;
}

/// Flat-file implementation of the storage traits
#[derive(Clone, Debug)]
pub struct FlatFileStorage {
    root: PathBuf,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("avatars"))?;
        Ok(Self { root })
    }

    fn avatar_path(&self, user_id: &str) -> Result<PathBuf, AppError> {
        // User ids are generated UUIDs; anything else would escape the directory
        if user_id.is_empty()
            || !user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(AppError::Validation("Invalid user id".to_string()));
        }
        Ok(self.root.join("avatars").join(format!("{user_id}.jpg")))
    }
}

#[async_trait]
impl AvatarStorage for FlatFileStorage {
    async fn store_avatar(&self, user_id: &str, bytes: &[u8]) -> Result<String, AppError> {
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(AppError::Validation(format!(
                "Avatar cannot exceed {} MiB",
                MAX_AVATAR_BYTES / (1024 * 1024)
            )));
        }
        let path = self.avatar_path(user_id)?;
        tokio_fs::create_dir_all(self.root.join("avatars")).await?;
        tokio_fs::write(&path, bytes).await?;
        Ok(format!("/avatars/{user_id}.jpg"))
    }

    async fn read_avatar(&self, user_id: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.avatar_path(user_id)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(tokio_fs::read(path).await?))
    }
}
