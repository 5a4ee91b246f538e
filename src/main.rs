use axum::{ServiceExt, extract::Request};
use category_service::{
    AppState,
    config::{AppConfig, Env},
    create_app,
    store::{DocumentStoreState, MemoryDocumentStore, PostgresDocumentStore},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, builds the document store and
/// serves the HTTP API.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production settings)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "category_service=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for log aggregation.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    if config.dev_auth_bypass {
        tracing::warn!("AUTH_DEV_BYPASS is on: x-user-id is accepted without a token");
    }

    // 3. Document store
    let store: DocumentStoreState = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            let store = PostgresDocumentStore::new(pool);
            store
                .migrate()
                .await
                .expect("FATAL: Failed to apply document store migrations.");
            Arc::new(store)
        }
        None => {
            // Only reachable in Env::Local; production requires DATABASE_URL.
            tracing::warn!("DATABASE_URL not set, using the in-memory document store");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // 4. State, router and server
    let app = create_app(AppState::new(store, config.clone()));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
