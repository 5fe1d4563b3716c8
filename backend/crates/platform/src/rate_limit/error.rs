//! Rate limiting errors

use thiserror::Error;

/// Errors produced while enforcing a rate limit.
///
/// `Exceeded` is the normal throttling signal. `InvalidPolicy` and
/// `InvalidBackendUrl` are deployment mistakes and must never be confused
/// with it. `BackendUnavailable` is recovered inside the limiter and only
/// escapes from the store adapters themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("Invalid rate limit value: {0:?}")]
    InvalidPolicy(String),

    #[error("Invalid rate limit backend URL: {0}")]
    InvalidBackendUrl(String),

    #[error("Rate limit backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Rate limit exceeded")]
    Exceeded,
}

impl RateLimitError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RateLimitError::InvalidPolicy(_) | RateLimitError::InvalidBackendUrl(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_distinct_from_throttling() {
        assert!(RateLimitError::InvalidPolicy("10".into()).is_configuration_error());
        assert!(RateLimitError::InvalidBackendUrl("nope".into()).is_configuration_error());
        assert!(!RateLimitError::Exceeded.is_configuration_error());
        assert!(!RateLimitError::BackendUnavailable("down".into()).is_configuration_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RateLimitError::InvalidPolicy("10/fortnight".into()).to_string(),
            r#"Invalid rate limit value: "10/fortnight""#
        );
        assert!(RateLimitError::Exceeded.to_string().contains("Rate limit"));
    }
}
