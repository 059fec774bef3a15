use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints outside every application surface, reachable without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Never touches the session.
        .route("/health", get(|| async { "ok" }))
}
