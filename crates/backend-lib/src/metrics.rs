// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "user.registered";
pub const USERS_TOTAL: &str = "user.total";
pub const LOGIN_SUCCEEDED: &str = "login.succeeded";
pub const LOGIN_FAILED: &str = "login.failed";
pub const LOGIN_LOCKED_OUT: &str = "login.locked_out";
pub const ROOM_CREDENTIAL_ISSUED: &str = "room_credential.issued";
pub const ROOM_CREDENTIAL_FAILED: &str = "room_credential.failed";
pub const CALL_RECORDED: &str = "call.recorded";
pub const REQUEST_RATE_LIMITED: &str = "request.rate_limited";
