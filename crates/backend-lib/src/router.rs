// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::rate_limit;
use crate::storage::{AvatarStorage, MAX_AVATAR_BYTES};
use crate::AppState;

/// Headroom for the text fields sent next to the avatar
const PROFILE_FORM_OVERHEAD: usize = 64 * 1024;

/// Create the API router
pub fn create_router<S: AvatarStorage + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::<S>))
        .route("/login", post(handlers::login::<S>))
        .route("/register", post(handlers::register::<S>))
        .route("/token", post(handlers::issue_room_token::<S>))
        .route("/users", get(handlers::list_users::<S>))
        .route(
            "/users/profile",
            put(handlers::update_profile::<S>)
                .layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + PROFILE_FORM_OVERHEAD)),
        )
        .route(
            "/stats",
            get(handlers::get_stats::<S>).post(handlers::record_call::<S>),
        )
        .route("/avatars/{file}", get(handlers::avatar::<S>))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
