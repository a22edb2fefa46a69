// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod rate_limit;
mod service;
mod service_impl;
pub mod session;
pub mod token_generator;

pub use password::{hash_password, verify_password};
pub use rate_limit::AuthRateLimiter;
pub use service::{AuthService, ProfileUpdate};
pub use service_impl::DefaultAuth;
pub use session::{SessionClaims, SessionTokens, SESSION_TTL};
