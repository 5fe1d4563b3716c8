//! Contact Error Types
//!
//! Contact-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rate_limit::RateLimitError;
use thiserror::Error;

/// Contact-specific result type alias
pub type ContactResult<T> = Result<T, ContactError>;

#[derive(Debug, Error)]
pub enum ContactError {
    /// Client exceeded the contact submission policy
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// A request field failed validation
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Body was not valid JSON for the request type
    #[error("Invalid request body: {0}")]
    InvalidBody(AppError),

    /// Limiter misconfiguration (bad policy string or backend URL)
    #[error("Rate limiter misconfigured: {0}")]
    RateLimiter(RateLimitError),

    /// Slack delivery failed
    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContactError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ContactError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContactError::RateLimitExceeded => ErrorKind::TooManyRequests,
            ContactError::Validation { .. } => ErrorKind::UnprocessableEntity,
            ContactError::InvalidBody(app) => app.kind(),
            ContactError::RateLimiter(_)
            | ContactError::Database(_)
            | ContactError::Notification(_)
            | ContactError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ContactError::Database(e) => {
                tracing::error!(error = %e, "Contact database error");
            }
            ContactError::RateLimiter(e) => {
                tracing::error!(error = %e, "Contact rate limiter misconfigured");
            }
            ContactError::Notification(msg) | ContactError::Internal(msg) => {
                tracing::error!(message = %msg, "Contact internal error");
            }
            ContactError::RateLimitExceeded => {
                tracing::debug!("Contact rate limit exceeded");
            }
            ContactError::Validation { .. } | ContactError::InvalidBody(_) => {
                tracing::debug!(error = %self, "Contact validation failed");
            }
        }
    }
}

impl From<JsonRejection> for ContactError {
    fn from(rejection: JsonRejection) -> Self {
        ContactError::InvalidBody(AppError::from(rejection))
    }
}

impl From<RateLimitError> for ContactError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::Exceeded => ContactError::RateLimitExceeded,
            other => ContactError::RateLimiter(other),
        }
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::RateLimitExceeded => AppError::too_many_requests("rate_limit_exceeded"),
            ContactError::Validation { .. } => AppError::unprocessable(err.to_string()),
            ContactError::InvalidBody(app) => app,
            ContactError::Database(e) => AppError::from(e),
            ContactError::RateLimiter(_)
            | ContactError::Notification(_)
            | ContactError::Internal(_) => AppError::internal("Internal server error"),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
