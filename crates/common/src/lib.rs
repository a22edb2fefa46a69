// ================
// crates/common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the Klubok web client and server.
//! This module defines the JSON request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a user record. Password hashes never appear here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /login`
///
/// Missing fields deserialize as empty strings so the server can answer
/// with a validation error instead of a decoding failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /register`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response to a successful login or registration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionResponse {
    /// The authenticated user
    pub user: UserView,
    /// Session token to present as `Authorization: Bearer <token>`
    pub token: String,
}

/// Body of `POST /token`
///
/// `identity` and `name` are accepted for compatibility with older clients.
/// The server always derives the identity from the session token.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TokenRequest {
    #[serde(default)]
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Room access credential plus the media server endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub ws_url: String,
}

/// Response of `GET /users`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UsersResponse {
    pub users: Vec<UserView>,
}

/// Response of `PUT /users/profile`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileResponse {
    pub user: UserView,
}

/// Kind of call
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Video,
    Audio,
}

/// Body of `POST /stats`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecordCallRequest {
    #[serde(rename = "type")]
    pub call_type: CallType,
    #[serde(default)]
    pub participants: Vec<String>,
    /// Call length in minutes
    #[serde(default)]
    pub duration: u64,
}

/// A finished call as kept by the statistics registry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub participants: Vec<String>,
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
}

/// Response of `POST /stats`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecordCallResponse {
    pub success: bool,
    pub call: CallRecord,
}

/// Aggregated call counters
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallStats {
    pub total_calls: u64,
    pub video_calls: u64,
    pub audio_calls: u64,
    pub total_duration: u64,
    pub average_duration: u64,
}

/// Response of `GET /stats`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: CallStats,
    /// Most recent calls, newest first
    pub recent_calls: Vec<CallRecord>,
}

/// Error payload returned by every endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
