//! Rate limit policy parsing

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::RateLimitError;

/// Parsed `"<count>/<unit>"` policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum requests allowed in the window
    max_requests: u32,
    /// Time window duration
    window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitPolicy {
    /// Both values must be positive.
    pub fn new(max_requests: u32, window_secs: u64) -> Result<Self, RateLimitError> {
        if max_requests == 0 || window_secs == 0 {
            return Err(RateLimitError::InvalidPolicy(format!(
                "{}/{}s",
                max_requests, window_secs
            )));
        }
        Ok(Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }

    /// Parse a policy such as `"10/minute"` or `"120 / Hours"`.
    ///
    /// Units are case-insensitive and accept singular or plural forms of
    /// second, minute, hour and day.
    pub fn parse(value: &str) -> Result<Self, RateLimitError> {
        let invalid = || RateLimitError::InvalidPolicy(value.to_string());

        let (count_raw, unit_raw) = value.split_once('/').ok_or_else(invalid)?;
        let max_requests: u32 = count_raw.trim().parse().map_err(|_| invalid())?;
        let window_secs = unit_secs(&unit_raw.trim().to_ascii_lowercase()).ok_or_else(invalid)?;

        Self::new(max_requests, window_secs).map_err(|_| invalid())
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

fn unit_secs(unit: &str) -> Option<u64> {
    match unit {
        "second" | "seconds" => Some(1),
        "minute" | "minutes" => Some(60),
        "hour" | "hours" => Some(3600),
        "day" | "days" => Some(86_400),
        _ => None,
    }
}

impl FromStr for RateLimitPolicy {
    type Err = RateLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RateLimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}s", self.max_requests, self.window_secs())
    }
}
