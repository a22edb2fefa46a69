// ==============================
// tests/unit/validation_tests.rs
// ==============================
use klubok_backend_lib::validation::{
    validate_email, validate_identity, validate_room_name, validate_username, ValidationError,
};

#[test]
fn test_usernames() {
    assert_eq!(validate_username("  alice "), Ok("alice"));
    assert!(validate_username("Иван_99").is_ok());
    assert!(matches!(
        validate_username("a"),
        Err(ValidationError::InvalidUsername(_))
    ));
    assert!(validate_username("has space").is_err());
    assert!(validate_username(&"x".repeat(33)).is_err());
}

#[test]
fn test_emails() {
    assert_eq!(validate_email("admin@klubok.com"), Ok("admin@klubok.com"));
    assert!(validate_email("").is_err());
    assert!(validate_email("admin@").is_err());
    assert!(validate_email("no-at-sign.com").is_err());
}

#[test]
fn test_room_names() {
    assert_eq!(validate_room_name("call-video-abcd12"), Ok("call-video-abcd12"));
    assert_eq!(validate_room_name(" team:standup@2 "), Ok("team:standup@2"));
    assert!(matches!(
        validate_room_name(""),
        Err(ValidationError::InvalidRoom(_))
    ));
    assert!(validate_room_name("   ").is_err());
    assert_eq!(validate_room_name("Team Sync"), Ok("Team Sync"));
    assert_eq!(validate_room_name("Комната 1"), Ok("Комната 1"));
    assert_eq!(validate_room_name("room#1"), Ok("room#1"));
    assert!(validate_room_name(&"r".repeat(129)).is_err());
}

#[test]
fn test_identities() {
    assert_eq!(validate_identity(" admin "), Ok("admin"));
    assert!(validate_identity("").is_err());
}
