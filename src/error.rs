use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Error en la frontera HTTP. Todas las rutas responden `{ error, details? }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{error}")]
    Internal { error: String, details: Option<String> },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    /// 500 with a fixed user-facing message and the underlying cause as `details`.
    pub fn internal(error: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Internal { error: error.into(), details: Some(details.to_string()) }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Internal { error, details: Some(d) } => {
                error!(error = %error, details = %d, "request failed");
                json!({"error": error, "details": d})
            }
            other => json!({"error": other.to_string()}),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            other => ApiError::Internal { error: other.to_string(), details: None },
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ApiError::internal("Storage worker unavailable", e)
    }
}
