use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::DeclineCode;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Username and password are required")]
    pub error: String,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `UNAUTHORIZED`, `FORBIDDEN`,
    /// `NOT_FOUND`, `CONFLICT`, `USERNAME_TAKEN`, `UNPROCESSABLE`,
    /// `INTERNAL_ERROR`, or a payment decline code.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Only present on payment declines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_allowed: Option<bool>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// 401 with a caller-facing reason (e.g. API key problems).
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    /// The request was well-formed but the stored state rules it out.
    Unprocessable(String),
    PaymentDeclined(DeclineCode),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_MISSING",
                "Unauthorized".into(),
            ),
            AppError::TokenInvalid => (
                StatusCode::FORBIDDEN,
                "TOKEN_INVALID",
                "Invalid token".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".into(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::UsernameTaken => (
                StatusCode::BAD_REQUEST,
                "USERNAME_TAKEN",
                "Username already exists".into(),
            ),
            AppError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE", msg)
            }
            AppError::PaymentDeclined(decline) => {
                return (
                    StatusCode::PAYMENT_REQUIRED,
                    ErrorBody {
                        error: decline.message().into(),
                        code: decline.as_str(),
                        retry_allowed: Some(decline.is_retryable()),
                    },
                );
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        };

        (
            status,
            ErrorBody {
                error,
                code,
                retry_allowed: None,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
