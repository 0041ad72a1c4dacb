//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use docshare_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiResponse;

/// Message returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// A 400 for malformed request input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::validation(message))
    }

    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(
                kind = %self.0.kind,
                error = %self.0,
                source = ?self.0.source,
                "Request failed"
            );
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.0.message
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(AppError::not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AppError::validation("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(AppError::conflict("x")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(AppError::storage("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(AppError::database("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let response = ApiError(AppError::storage("bucket secret-bucket is gone")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
