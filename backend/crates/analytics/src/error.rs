//! Analytics Error Types

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rate_limit::RateLimitError;
use thiserror::Error;

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Body was not valid JSON for the request type
    #[error("Invalid request body: {0}")]
    InvalidBody(AppError),

    #[error("Rate limiter misconfigured: {0}")]
    RateLimiter(RateLimitError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AnalyticsError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AnalyticsError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::RateLimitExceeded => ErrorKind::TooManyRequests,
            AnalyticsError::Validation { .. } => ErrorKind::UnprocessableEntity,
            AnalyticsError::InvalidBody(app) => app.kind(),
            AnalyticsError::RateLimiter(_) | AnalyticsError::Database(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    fn log(&self) {
        match self {
            AnalyticsError::Database(e) => {
                tracing::error!(error = %e, "Analytics database error");
            }
            AnalyticsError::RateLimiter(e) => {
                tracing::error!(error = %e, "Analytics rate limiter misconfigured");
            }
            _ => {
                tracing::debug!(error = %self, "Analytics error");
            }
        }
    }
}

impl From<JsonRejection> for AnalyticsError {
    fn from(rejection: JsonRejection) -> Self {
        AnalyticsError::InvalidBody(AppError::from(rejection))
    }
}

impl From<RateLimitError> for AnalyticsError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::Exceeded => AnalyticsError::RateLimitExceeded,
            other => AnalyticsError::RateLimiter(other),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::RateLimitExceeded => AppError::too_many_requests("rate_limit_exceeded"),
            AnalyticsError::Validation { .. } => AppError::unprocessable(err.to_string()),
            AnalyticsError::InvalidBody(app) => app,
            AnalyticsError::Database(e) => AppError::from(e),
            AnalyticsError::RateLimiter(_) => AppError::internal("Internal server error"),
        }
    }
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let exceeded: AnalyticsError = RateLimitError::Exceeded.into();
        assert_eq!(exceeded.kind(), ErrorKind::TooManyRequests);

        let misconfigured: AnalyticsError = RateLimitError::InvalidPolicy("0/minute".into()).into();
        assert_eq!(misconfigured.kind(), ErrorKind::InternalServerError);

        let invalid = AnalyticsError::validation("path", "must not be empty");
        assert_eq!(invalid.kind(), ErrorKind::UnprocessableEntity);
        assert_eq!(AppError::from(invalid).message(), "path: must not be empty");
    }
}
