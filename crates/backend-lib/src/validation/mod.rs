// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for registration, profile edits and room requests.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::PasswordRequirements;

// Common validation constants
const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 32;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_ROOM_NAME_LENGTH: usize = 128;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_.-]+$").expect("valid username regex"));
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid room: {0}")]
    InvalidRoom(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a display name used as the login handle
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    let username = username.trim();
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH || len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::InvalidUsername(
            "Username may contain only letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(username)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email must not be empty".to_string(),
        ));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Email format is invalid".to_string(),
        ));
    }
    Ok(email)
}

/// Check a password against the configured requirements
pub fn validate_password(
    password: &str,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    if password.chars().count() < requirements.min_length {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {} characters",
            requirements.min_length
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain an uppercase letter".to_string(),
        ));
    }
    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a lowercase letter".to_string(),
        ));
    }
    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a digit".to_string(),
        ));
    }
    if requirements.require_special && password.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a special character".to_string(),
        ));
    }
    Ok(())
}

/// Validate a media room name. Any non-blank name up to the length cap is accepted.
pub fn validate_room_name(room: &str) -> ValidationResult<&str> {
    let room = room.trim();
    if room.is_empty() {
        return Err(ValidationError::InvalidRoom("Room is required".to_string()));
    }
    if room.chars().count() > MAX_ROOM_NAME_LENGTH {
        return Err(ValidationError::InvalidRoom(format!(
            "Room name cannot exceed {MAX_ROOM_NAME_LENGTH} characters"
        )));
    }
    Ok(room)
}

/// Validate a participant identity
pub fn validate_identity(identity: &str) -> ValidationResult<&str> {
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(ValidationError::InvalidIdentity(
            "Identity is required".to_string(),
        ));
    }
    Ok(identity)
}
