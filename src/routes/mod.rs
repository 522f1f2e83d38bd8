//! API routes

pub mod auth;
pub mod health;
pub mod users;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{authenticate, require_auth},
    state::AppState,
};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.auth_state();

    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Public API routes (no auth required)
    let public_api_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Protected API routes: the authorization layer rejects requests the
    // authentication middleware left unauthenticated
    let protected_api_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/users/:account_id", get(users::get_account))
        .layer(middleware::from_fn(require_auth));

    // Authentication runs on every API request; it establishes the identity
    // when a valid access token is present and never fails the request itself
    let api_v1_routes = Router::new()
        .merge(public_api_routes)
        .merge(protected_api_routes)
        .layer(middleware::from_fn_with_state(auth_state, authenticate));

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", api_v1_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
