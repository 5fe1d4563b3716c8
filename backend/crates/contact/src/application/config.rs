//! Application Configuration

/// Limiter endpoint name for contact submissions
pub const RATE_LIMIT_ENDPOINT: &str = "contact_submission";

/// Contact application configuration
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Policy string, e.g. `"10/minute"`
    pub rate_limit: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            rate_limit: "10/minute".to_string(),
        }
    }
}

impl ContactConfig {
    pub fn new(rate_limit: impl Into<String>) -> Self {
        Self {
            rate_limit: rate_limit.into(),
        }
    }
}
