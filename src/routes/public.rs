use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that are unauthenticated and carry no data.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Used by load balancers and monitoring; never touches the store.
        .route("/health", get(|| async { "ok" }))
}
