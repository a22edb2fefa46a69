// ============================
// crates/backend-lib/src/media/livekit.rs
// ============================
//! LiveKit-compatible access tokens.
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::{MediaProvider, RoomGrant};
use crate::error::AppResult;

/// Video grant embedded in the access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room: String,
    pub room_join: bool,
    pub can_publish: bool,
    pub can_subscribe: bool,
}

/// Claims of a LiveKit access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveKitClaims {
    /// API key
    pub iss: String,
    /// Participant identity
    pub sub: String,
    /// Participant display name
    pub name: String,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
    pub video: VideoGrant,
}

/// Mints access tokens signed with the project's API secret
pub struct LiveKitProvider {
    api_key: String,
    encoding_key: EncodingKey,
    ws_url: String,
    ttl: Duration,
}

impl std::fmt::Debug for LiveKitProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveKitProvider")
            .field("api_key", &self.api_key)
            .field("ws_url", &self.ws_url)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl LiveKitProvider {
    pub fn new(api_key: &str, api_secret: &str, ws_url: &str, ttl: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            encoding_key: EncodingKey::from_secret(api_secret.as_bytes()),
            ws_url: ws_url.to_string(),
            ttl,
        }
    }
}

impl MediaProvider for LiveKitProvider {
    fn mint(&self, grant: &RoomGrant) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = LiveKitClaims {
            iss: self.api_key.clone(),
            sub: grant.identity.clone(),
            name: grant.display_name.clone(),
            nbf: now,
            exp: now.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
            jti: grant.identity.clone(),
            video: VideoGrant {
                room: grant.room.clone(),
                room_join: true,
                can_publish: true,
                can_subscribe: true,
            },
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    fn ws_url(&self) -> &str {
        &self.ws_url
    }
}
