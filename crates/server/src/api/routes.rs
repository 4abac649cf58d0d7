use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Operational surface
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/cache/stats", get(handlers::cache_stats));

    // Addon surface consumed by players; the stream route carries a
    // ".json" suffix inside the id segment, stripped in the handler.
    Router::new()
        .route("/manifest.json", get(handlers::manifest))
        .route("/stream/{content_type}/{id}", get(handlers::stream))
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
