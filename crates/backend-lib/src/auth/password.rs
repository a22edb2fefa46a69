// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};

use super::token_generator::random_bytes;
use crate::config::ScryptSettings;

/// Salt size in bytes
const SALT_BYTES: usize = 16;

/// Hash a password using scrypt with the given work factor.
///
/// This is CPU and memory heavy; call it from a blocking context.
pub fn hash_password(plain: &str, cost: &ScryptSettings) -> anyhow::Result<String> {
    let params = Params::new(cost.log_n, cost.r, cost.p, Params::RECOMMENDED_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;
    let salt = SaltString::encode_b64(&random_bytes(SALT_BYTES))
        .map_err(|e| anyhow::anyhow!("failed to encode salt: {e}"))?;
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a PHC hash string.
///
/// The work factor is read from the hash itself. Malformed hashes never match.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}
