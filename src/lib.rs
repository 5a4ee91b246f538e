use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::{Layer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod store;

// Routing, split by access level (public, authenticated categories).
pub mod routes;
use auth::AuthUser;
use routes::{categories, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::CategoryRepository;
pub use store::{DocumentStoreState, MemoryDocumentStore, PostgresDocumentStore};

/// ApiDoc
///
/// The OpenAPI document for the service, served at `/api-docs/openapi.json`
/// and browsable under `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_category,
        handlers::list_categories,
        handlers::update_category,
        handlers::delete_category
    ),
    components(
        schemas(
            models::CategoryInput, models::CategoryView, models::CreateCategoryResponse,
            models::ListCategoriesResponse, models::UpdateCategoryResponse,
            models::DeleteCategoryResponse, models::ErrorResponse,
        )
    ),
    tags(
        (name = "categories", description = "Category resource API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single container of shared services, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Typed access to the `categories` collection of the document store.
    pub repo: CategoryRepository,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Builds the state around an explicitly constructed store.
    pub fn new(store: DocumentStoreState, config: AppConfig) -> Self {
        Self {
            repo: CategoryRepository::new(store),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Lets the `AuthUser` extractor pull the configuration out of the state.
impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the category routes. Extracting `AuthUser`
/// rejects the request with 401 before the handler (and therefore the store)
/// is reached.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routes, applies global and scoped middleware, and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Authenticated: every category route passes through `auth_middleware`.
        .nest(
            "/categories",
            categories::category_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    // Observability and correlation layers (outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// App
///
/// The servable application: the router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// create_app
///
/// Wraps `create_router` so `/categories/` routes like `/categories`. The
/// rewrite has to happen before routing, so it wraps the whole `Router`
/// instead of being added with `Router::layer`.
pub fn create_app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}

/// trace_span_logger
///
/// Builds the per-request tracing span so every log line for one request
/// carries the same `req_id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
