use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use jobfinder_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::RenderUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Cache(_) | AppError::Serialization(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "Request failed");
        }

        let body = ErrorResponse {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
