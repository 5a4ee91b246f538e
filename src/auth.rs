use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, Env};

/// Claims
///
/// The payload expected inside a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the caller's uid.
    pub sub: String,
    /// Expiration Time (exp): tokens past this instant are rejected.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
}

/// AuthUser Extractor Implementation
///
/// Usable as a handler argument or inside the router's auth middleware. Runs
/// before any handler body, so a rejected request never reaches the store.
///
/// 1. Local Bypass: in `Env::Local` with `dev_auth_bypass` switched on, a
///    non-empty `x-user-id` header is taken as the caller uid.
/// 2. Token Validation: `Authorization: Bearer <jwt>`, HS256 with the
///    configured secret, expiry enforced.
///
/// Rejection: StatusCode::UNAUTHORIZED (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local && config.dev_auth_bypass {
            let bypass_uid = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|uid| !uid.is_empty());

            if let Some(uid) = bypass_uid {
                return Ok(AuthUser {
                    uid: uid.to_string(),
                });
            }
        }
        // Bypass off, or no bypass header: standard bearer token flow.

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!("rejected bearer token: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

        Ok(AuthUser {
            uid: token_data.claims.sub,
        })
    }
}
