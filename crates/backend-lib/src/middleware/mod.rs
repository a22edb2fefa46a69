// crates/backend-lib/src/middleware/mod.rs

//! Middleware and extractors for the HTTP API.

pub mod auth;
pub mod rate_limit;

pub use auth::{bearer_token, AuthenticatedUser};
pub use rate_limit::{client_key, rate_limit, RateLimiter};
