use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use category_service::{
    AppState, MemoryDocumentStore,
    auth::{AuthUser, Claims},
    config::{AppConfig, Env},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_UID: &str = "firebase-uid-123";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn create_token(uid: &str, secret: &str, exp: u64) -> String {
    let claims = Claims {
        sub: uid.to_string(),
        iat: now_secs() as usize,
        exp: exp as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        dev_auth_bypass: true,
        ..AppConfig::default()
    };
    AppState::new(Arc::new(MemoryDocumentStore::new()), config)
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let token = create_token(TEST_UID, TEST_JWT_SECRET, now_secs() + 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(
        auth_user,
        Ok(AuthUser {
            uid: TEST_UID.to_string()
        })
    );
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_without_bearer_prefix() {
    let token = create_token(TEST_UID, TEST_JWT_SECRET, now_secs() + 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&token).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_wrong_secret() {
    let token = create_token(TEST_UID, "some-other-secret", now_secs() + 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    // Well past the default validation leeway.
    let token = create_token(TEST_UID, TEST_JWT_SECRET, now_secs() - 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_garbage_token() {
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    with_bearer(&mut parts, "not.a.jwt");

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_success() {
    let app_state = create_app_state(Env::Local);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_static("local-dev-user"),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap().uid, "local-dev-user");
}

#[tokio::test]
async fn test_local_bypass_ignores_blank_header() {
    let app_state = create_app_state(Env::Local);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_static("   "),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_still_accepts_jwt() {
    let token = create_token(TEST_UID, TEST_JWT_SECRET, now_secs() + 3600);
    let app_state = create_app_state(Env::Local);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap().uid, TEST_UID);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_static("local-dev-user"),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_default_config_rejects_bare_user_id_header() {
    // The bypass is opt-in: the default local config still wants a token.
    let app_state = AppState::new(Arc::new(MemoryDocumentStore::new()), AppConfig::default());
    assert_eq!(app_state.config.env, Env::Local);

    let mut parts = get_request_parts(Method::GET, "/categories".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_static("anyone-at-all"),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}
