use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{models::ErrorResponse, store::StoreError};

/// ApiError
///
/// Failure of a category handler after authentication has passed. Every
/// variant renders as `{ "success": false, "error": <Display> }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: the addressed category does not exist (update only).
    #[error("Category with ID {0} not found")]
    NotFound(String),

    /// 500: the document store call failed.
    #[error("Server error {0}")]
    Store(StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => ApiError::NotFound(id),
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
