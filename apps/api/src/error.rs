use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rolegate_core::AppError;

mod types;

pub use types::ErrorResponse;

/// Body returned for upstream failures; the detail is only logged.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data from the directory API.";

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) | AppError::Configuration(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self.0 {
            AppError::Upstream(detail) => {
                tracing::error!(detail = %detail, "directory request failed");
                UPSTREAM_FAILURE_MESSAGE.to_owned()
            }
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                detail.clone()
            }
            other => other.detail().to_owned(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
