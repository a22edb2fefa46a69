// ============================
// crates/backend-lib/src/media/issuer.rs
// ============================
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;

use super::{LiveKitProvider, MediaProvider, RoomGrant};
use crate::config::MediaSettings;
use crate::error::{AppError, AppResult};
use crate::metrics as keys;
use crate::validation::{validate_identity, validate_room_name};

/// A minted room credential and where to use it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCredential {
    pub token: String,
    pub ws_url: String,
}

/// Turns a verified identity and a room name into a provider credential
pub struct CredentialIssuer {
    provider: Result<Arc<dyn MediaProvider>, String>,
}

impl CredentialIssuer {
    /// Issuer backed by an explicit provider
    pub fn new(provider: Arc<dyn MediaProvider>) -> Self {
        Self {
            provider: Ok(provider),
        }
    }

    /// Issuer that fails every request with a configuration error
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            provider: Err(reason.into()),
        }
    }

    /// Build the LiveKit-backed issuer from settings.
    ///
    /// Missing credentials do not stop the server; calls fail until they are set.
    pub fn from_settings(settings: &MediaSettings) -> Self {
        let missing: Vec<&str> = [
            ("media.api_key", &settings.api_key),
            ("media.api_secret", &settings.api_secret),
            ("media.ws_url", &settings.ws_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        match (&settings.api_key, &settings.api_secret, &settings.ws_url) {
            (Some(key), Some(secret), Some(url)) if missing.is_empty() => {
                Self::new(Arc::new(LiveKitProvider::new(
                    key,
                    secret,
                    url,
                    Duration::from_secs(settings.credential_ttl_secs),
                )))
            },
            _ => {
                let reason = format!("missing media provider settings: {}", missing.join(", "));
                tracing::warn!("{reason}; room credentials are disabled");
                Self::unconfigured(reason)
            },
        }
    }

    /// Whether a provider is configured
    pub fn is_configured(&self) -> bool {
        self.provider.is_ok()
    }

    /// Mint a credential for `identity` in `room`.
    ///
    /// `display_name` defaults to `identity`.
    pub fn issue_room_credential(
        &self,
        room: &str,
        identity: &str,
        display_name: Option<&str>,
    ) -> AppResult<RoomCredential> {
        let room = validate_room_name(room)?;
        let identity = validate_identity(identity)?;
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(identity);

        let provider = self
            .provider
            .as_ref()
            .map_err(|reason| AppError::Configuration(reason.clone()))?;

        let grant = RoomGrant {
            room: room.to_string(),
            identity: identity.to_string(),
            display_name: display_name.to_string(),
        };
        let token = provider.mint(&grant).inspect_err(|e| {
            counter!(keys::ROOM_CREDENTIAL_FAILED).increment(1);
            tracing::error!(room, identity, error = %e, "failed to mint room credential");
        })?;

        counter!(keys::ROOM_CREDENTIAL_ISSUED).increment(1);
        tracing::info!(room, identity, "room credential issued");

        Ok(RoomCredential {
            token,
            ws_url: provider.ws_url().to_string(),
        })
    }
}
