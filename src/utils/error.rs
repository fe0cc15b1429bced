use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::{error_report, ErrorReport};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error")]
    DatabaseError(#[source] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Invalid JSON document",
            AppError::UnsupportedMediaType(_) => "Unsupported media type",
            AppError::NotFound(_) => "Not found",
            AppError::Conflict(_) => "Already exists",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Internal server error"
            }
        }
    }

    fn log(&self) {
        match self {
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            _ => {
                warn!(error = %self, "Request rejected");
            }
        }
    }

    fn public_messages(self) -> Vec<String> {
        match self {
            AppError::ValidationError(messages) => messages,
            AppError::UnsupportedMediaType(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => vec![msg],
            // Internal details stay in the log
            AppError::DatabaseError(_) => vec!["A database error occurred".to_string()],
            AppError::InternalServerError(_) => vec!["An unexpected error occurred".to_string()],
        }
    }
}

/// Expected constraint violations are client errors; anything else the
/// database reports is a server fault.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return AppError::DatabaseError(err);
        };
        if db_err.is_unique_violation() {
            AppError::Conflict(db_err.message().to_string())
        } else if db_err.is_foreign_key_violation() {
            AppError::invalid("Referenced resource does not exist")
        } else if matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation) {
            AppError::invalid(db_err.message())
        } else {
            AppError::DatabaseError(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let title = self.title();

        self.log();

        error_report(
            status,
            ErrorReport {
                title,
                messages: self.public_messages(),
            },
        )
    }
}
