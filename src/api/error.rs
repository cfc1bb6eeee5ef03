// API error types and JSON error response formatting
// Maps the crate error taxonomy to HTTP status codes with a consistent
// JSON body shape across all endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::DocvecError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "not_found", "unsupported_media_type").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 404 Not Found - referenced file or resource does not exist.
    NotFound(String),
    /// 415 Unsupported Media Type - file extension outside the supported set.
    UnsupportedMediaType(String),
    /// 422 Unprocessable Entity - content that fails format validation.
    UnprocessableEntity(String),
    /// 500 Internal Server Error - store, index, or embedding failure.
    Internal(String),
    /// 503 Service Unavailable - embedding model not ready.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    #[inline]
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                msg,
            ),
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable_entity", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DocvecError> for ApiError {
    #[inline]
    fn from(err: DocvecError) -> Self {
        let message = err.to_string();
        match err {
            DocvecError::FileNotFound(_) => ApiError::NotFound(message),
            DocvecError::UnsupportedType(_) => ApiError::UnsupportedMediaType(message),
            DocvecError::InvalidFormat(_) => ApiError::UnprocessableEntity(message),
            DocvecError::ModelUnavailable(_) => ApiError::ServiceUnavailable(message),
            _ => ApiError::Internal(message),
        }
    }
}
