use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sweldo_core::{AccessError, AppError};

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        // Below the navigation layer these are caller-visible, non-retryable
        // outcomes: missing identity maps to 401, missing access to 403.
        let error = match value {
            AccessError::NoSession => AppError::Unauthorized("authentication required".to_owned()),
            AccessError::Malformed(detail) => {
                AppError::Unauthorized(format!("session identity is malformed: {detail}"))
            }
            AccessError::NoAccess => {
                AppError::Forbidden("no access to the requested company".to_owned())
            }
            AccessError::InactiveCompany(company_id) => {
                AppError::Forbidden(format!("company '{company_id}' is deactivated"))
            }
            AccessError::Internal(error) => error,
        };

        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
