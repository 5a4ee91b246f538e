use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// FormOrJson Extractor
///
/// Reads a request body that may be sent either as
/// `application/x-www-form-urlencoded` (HTML forms) or as JSON.
///
/// - Form content type: delegates to `axum::Form`.
/// - Any other content type: delegates to `axum::Json`, which rejects
///   non-JSON media types with 415.
/// - No content type and an empty body: yields `T::default()`.
///
/// Rejections are the standard Axum ones (400/415/422).
#[derive(Debug, Clone, Default)]
pub struct FormOrJson<T>(pub T);

impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Ok(FormOrJson(value))
            }
            Some(_) => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Ok(FormOrJson(value))
            }
            None => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                if body.is_empty() {
                    Ok(FormOrJson(T::default()))
                } else {
                    Err((
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        "Expected a form-encoded or JSON request body",
                    )
                        .into_response())
                }
            }
        }
    }
}
