use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Category Router Module
///
/// The four category operations. Paths are relative to the `/categories`
/// prefix this router is nested under.
///
/// Access Control:
/// Every route requires a resolved `AuthUser`. The router is wrapped by the
/// auth middleware in `create_router`, so a request without a valid
/// credential is rejected before any handler runs.
pub fn category_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /categories   create (201)
        // GET  /categories   list all (200)
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        // PUT    /categories/{id}   overwrite title/description, stamp updated_at
        // DELETE /categories/{id}   permanent, idempotent
        .route(
            "/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
}
