//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Search routes
        .route("/search", get(handlers::search))
        .route("/search/export", get(handlers::export))
        .route("/search/canonical", get(handlers::canonical))
        // Saved searches
        .route(
            "/saved-searches/normalize",
            post(handlers::normalize_saved_search),
        )
        .route("/saved-searches/:id/search", get(handlers::saved_search))
        // API routes
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        // Add state
        .with_state(state)
}
