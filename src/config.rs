use std::env;

/// AppConfig
///
/// Holds the service's entire configuration. Immutable once loaded and pulled
/// into handlers and extractors via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` selects the in-memory document store
    // (only allowed in Env::Local).
    pub db_url: Option<String>,
    // Upper bound on pooled Postgres connections.
    pub db_max_connections: u32,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls the auth bypass and log format.
    pub env: Env,
    // HS256 secret used to validate incoming bearer tokens.
    pub jwt_secret: String,
    // Accept a bare `x-user-id` header as the caller identity. Off unless
    // AUTH_DEV_BYPASS is set, and never allowed in Env::Production.
    pub dev_auth_bypass: bool,
}

/// Env
///
/// The runtime context: local development (pretty logs, opt-in `x-user-id`
/// bypass, optional database) or production (JSON logs, hardened auth,
/// database required).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl Default for AppConfig {
    /// Safe, non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            db_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: "127.0.0.1:0".to_string(),
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            dev_auth_bypass: false,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables at startup.
    ///
    /// # Panics
    /// Panics if a variable required by the current environment is missing
    /// (`DATABASE_URL` and `AUTH_JWT_SECRET` in production), or if
    /// `DATABASE_MAX_CONNECTIONS` is not a number, or if `AUTH_DEV_BYPASS` is
    /// enabled in production. The service must not start half-configured.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => env::var("AUTH_JWT_SECRET")
                .expect("FATAL: AUTH_JWT_SECRET must be set in production."),
            Env::Local => {
                env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string())
            }
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production"),
            ),
            Env::Local => env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        };

        let db_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .map(|raw| {
                raw.parse()
                    .expect("FATAL: DATABASE_MAX_CONNECTIONS must be a positive integer")
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let dev_auth_bypass = matches!(
            env::var("AUTH_DEV_BYPASS").as_deref(),
            Ok("1") | Ok("true")
        );
        if dev_auth_bypass && env == Env::Production {
            panic!("FATAL: AUTH_DEV_BYPASS cannot be enabled in production");
        }

        Self {
            db_url,
            db_max_connections,
            bind_addr,
            env,
            jwt_secret,
            dev_auth_bypass,
        }
    }
}
