//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};

use crate::response::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Auth errors
    #[error("account does not exist")]
    InvalidCredentials,
    #[error("invalid token")]
    TokenInvalid,
    #[error("authentication required")]
    Unauthorized,
    #[error("access denied")]
    Forbidden,

    // Resource errors
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),

    // Validation errors
    #[error("validation failed: {0}")]
    ValidationError(String),

    // Database errors
    #[error("database error: {0}")]
    DatabaseError(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::TokenInvalid => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller
    pub fn public_message(&self) -> &str {
        match self {
            AppError::InvalidCredentials => "Account does not exist!",
            AppError::TokenInvalid => "Invalid token",
            AppError::Unauthorized => "Authentication required",
            AppError::Forbidden => "Access denied",
            AppError::NotFound(msg) => msg.as_str(),
            AppError::AlreadyExists(msg) => msg.as_str(),
            AppError::ValidationError(msg) => msg.as_str(),
            AppError::DatabaseError(_) => "Database error occurred",
            AppError::InternalError(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::DatabaseError(msg) => tracing::error!("Database error: {}", msg),
            AppError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let body = Json(ApiResponse::<()>::failure(self.public_message()));

        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::ValidationError("Invalid request body".to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::TokenInvalid
    }
}
