/// Router Module Index
///
/// Splits the routes by access level so authentication is applied per module
/// (via an Axum route layer) rather than per handler.

/// Routes accessible without a credential (health check).
pub mod public;

/// The category resource. Wrapped by the `AuthUser` middleware in
/// `create_router`; nested under `/categories`.
pub mod categories;
