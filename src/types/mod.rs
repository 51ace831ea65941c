//! Core types and error handling.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::api::pages;

// ============= Error Types =============

/// Application-wide error type.
///
/// Authentication and session failures are deliberately *not* represented
/// here: a bad cookie decodes to an empty session and bad credentials login
/// as `None`, so neither ever reaches the error path.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures are logged with their detail and rendered
        // with a generic message; the detail never reaches the client.
        let (status, message) = match self {
            AppError::Config(msg) | AppError::Database(msg) | AppError::Internal(msg) => {
                error!("request failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.".to_string(),
                )
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Html(pages::error_page(status, &message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
