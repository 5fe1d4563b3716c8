//! Application Configuration

/// Limiter endpoint name for pageview ingestion
pub const RATE_LIMIT_ENDPOINT: &str = "analytics_pageview";

/// Analytics application configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Policy string, e.g. `"120/minute"`
    pub rate_limit: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            rate_limit: "120/minute".to_string(),
        }
    }
}

impl AnalyticsConfig {
    pub fn new(rate_limit: impl Into<String>) -> Self {
        Self {
            rate_limit: rate_limit.into(),
        }
    }
}
