// ============================
// crates/backend-lib/src/media/mod.rs
// ============================
//! Room credentials for the external real-time media provider.
//!
//! Media transport itself happens between browsers and the provider; this
//! module only mints the short-lived credential a client presents when it
//! connects to a room.

mod issuer;
mod livekit;

pub use issuer::{CredentialIssuer, RoomCredential};
pub use livekit::{LiveKitClaims, LiveKitProvider, VideoGrant};

use crate::error::AppResult;

/// What a credential allows: one identity inside exactly one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomGrant {
    pub room: String,
    pub identity: String,
    pub display_name: String,
}

/// Seam to the provider's server-side token minting
pub trait MediaProvider: Send + Sync {
    /// Mint a signed credential granting join, publish and subscribe in `grant.room`
    fn mint(&self, grant: &RoomGrant) -> AppResult<String>;

    /// Client-facing connection URL
    fn ws_url(&self) -> &str;
}
