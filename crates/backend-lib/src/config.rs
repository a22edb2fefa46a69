// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "klubok.toml";

/// Prefix of environment overrides, e.g. `KLUBOK_MEDIA__API_KEY`
pub const ENV_PREFIX: &str = "KLUBOK_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;
/// Longest accepted room credential lifetime (30 days)
pub const MAX_CREDENTIAL_TTL_SECS: u64 = 30 * 24 * 60 * 60;
/// Longest accepted lockout or rate-limit window (one week)
pub const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub media: MediaSettings,
    pub rate_limit: RateLimitSettings,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// On-disk data locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

/// Session authentication settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC key for session tokens. A random key is generated when unset.
    pub jwt_secret: Option<String>,
    /// Session token lifetime in seconds
    pub session_ttl_secs: u64,
    /// Seed the demo accounts at startup
    pub seed_test_accounts: bool,
    pub password: PasswordRequirements,
    pub scrypt: ScryptSettings,
    /// Failed logins before a client is locked out
    pub login_max_attempts: u32,
    /// Lockout duration in seconds
    pub login_lockout_secs: u64,
}

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PasswordRequirements {
    /// Minimum password length
    pub min_length: usize,
    /// Require uppercase letters
    pub require_uppercase: bool,
    /// Require lowercase letters
    pub require_lowercase: bool,
    /// Require digits
    pub require_digit: bool,
    /// Require special characters
    pub require_special: bool,
}

/// scrypt work factor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScryptSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

/// Real-time media provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaSettings {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Client-facing WebSocket URL of the media server
    pub ws_url: Option<String>,
    /// Lifetime of room credentials in seconds
    pub credential_ttl_secs: u64,
}

/// Request rate limiting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            media: MediaSettings::default(),
            rate_limit: RateLimitSettings::default(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            seed_test_accounts: true,
            password: PasswordRequirements::default(),
            scrypt: ScryptSettings::default(),
            login_max_attempts: 5,
            login_lockout_secs: 5 * 60,
        }
    }
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

impl Default for ScryptSettings {
    fn default() -> Self {
        Self {
            log_n: 15,
            r: 8,
            p: 1,
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            ws_url: None,
            credential_ttl_secs: 6 * 60 * 60,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 100,
        }
    }
}

impl Settings {
    /// Load settings from `klubok.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from the given TOML file and the environment.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .with_context(|| format!("invalid configuration ({})", path.as_ref().display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Layered provider: defaults, then file, then `KLUBOK_*` variables
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid bind address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("log_level must be one of {LOG_LEVELS:?}, got {:?}", self.log_level);
        }
        if self.log_format != "pretty" && self.log_format != "json" {
            bail!("log_format must be \"pretty\" or \"json\"");
        }
        if self.auth.session_ttl_secs == 0 || self.auth.session_ttl_secs > MAX_SESSION_TTL_SECS {
            bail!("auth.session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}");
        }
        if self.auth.login_lockout_secs > MAX_WINDOW_SECS {
            bail!("auth.login_lockout_secs cannot exceed {MAX_WINDOW_SECS}");
        }
        if self.auth.password.min_length < 4 {
            bail!("auth.password.min_length must be at least 4");
        }
        if self.auth.login_max_attempts == 0 {
            bail!("auth.login_max_attempts must be greater than zero");
        }
        let scrypt = self.auth.scrypt;
        if scrypt.log_n == 0 || scrypt.log_n > 20 || scrypt.r == 0 || scrypt.p == 0 {
            bail!("auth.scrypt parameters out of range: {scrypt:?}");
        }
        if let Some(secret) = &self.auth.jwt_secret {
            if secret.len() < 16 {
                bail!("auth.jwt_secret must be at least 16 bytes");
            }
        }
        if self.media.credential_ttl_secs == 0
            || self.media.credential_ttl_secs > MAX_CREDENTIAL_TTL_SECS
        {
            bail!("media.credential_ttl_secs must be between 1 and {MAX_CREDENTIAL_TTL_SECS}");
        }
        if let Some(url) = &self.media.ws_url {
            if !(url.starts_with("wss://") || url.starts_with("ws://")) {
                bail!("media.ws_url must start with ws:// or wss://, got {url:?}");
            }
        }
        if self.rate_limit.window_secs == 0 || self.rate_limit.max_requests == 0 {
            bail!("rate_limit values must be greater than zero");
        }
        if self.rate_limit.window_secs > MAX_WINDOW_SECS {
            bail!("rate_limit.window_secs cannot exceed {MAX_WINDOW_SECS}");
        }
        self.bind_addr()?;
        Ok(())
    }
}
