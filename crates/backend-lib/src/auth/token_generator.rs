// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Secure random material for the authentication layer.
//!
//! Random bytes for password salts, generated signing keys and
//! phone-number-shaped user handles.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{Rng, RngCore};

/// Default secret size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_SECRET_BYTES: usize = 32;

/// Fill a buffer of `len` bytes from the thread-local CSPRNG
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    rand::rng().fill_bytes(&mut buffer);
    buffer
}

/// Generate a random signing secret
///
/// Used when no session signing key is configured.
///
/// # Returns
/// A base64 URL-safe encoded string without padding
pub fn generate_secret() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(DEFAULT_SECRET_BYTES))
}

/// Generate a phone-number-shaped handle in the `+666-AAA-NNNN` format
///
/// The area code is drawn from 100..=999 and the number from 1000..=9999.
pub fn generate_phone_number() -> String {
    let mut rng = rand::rng();
    let area_code: u16 = rng.random_range(100..=999);
    let number: u16 = rng.random_range(1000..=9999);
    format!("+666-{area_code}-{number}")
}
