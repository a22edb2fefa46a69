// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP request handlers.

pub mod health;
pub mod session;
pub mod stats;
pub mod token;
pub mod users;

pub use health::health;
pub use session::{login, register};
pub use stats::{get_stats, record_call};
pub use token::issue_room_token;
pub use users::{avatar, list_users, update_profile};
