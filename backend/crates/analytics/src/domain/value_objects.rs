//! Domain Value Objects
//!
//! Payload fields are trimmed and validated. Request metadata is trimmed and
//! cut to fit its column instead of being rejected.

use crate::error::{AnalyticsError, AnalyticsResult};

pub const PATH_MAX_LENGTH: usize = 2048;
pub const TITLE_MAX_LENGTH: usize = 255;
pub const REFERRER_MAX_LENGTH: usize = 2048;
pub const SESSION_ID_MAX_LENGTH: usize = 128;
pub const USER_AGENT_MAX_LENGTH: usize = 512;
pub const IP_ADDRESS_MAX_LENGTH: usize = 64;

fn too_long(field: &'static str, max: usize) -> AnalyticsError {
    AnalyticsError::validation(field, format!("must be at most {} characters", max))
}

/// Page path including query string, e.g. `/pricing?variant=a`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePath(String);

impl PagePath {
    pub fn new(value: &str) -> AnalyticsResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AnalyticsError::validation("path", "must not be empty"));
        }
        if value.chars().count() > PATH_MAX_LENGTH {
            return Err(too_long("path", PATH_MAX_LENGTH));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trim an optional payload field; blank becomes `None`
pub fn optional_field(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> AnalyticsResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) if v.chars().count() > max => Err(too_long(field, max)),
        Some(v) => Ok(Some(v.to_string())),
        None => Ok(None),
    }
}

/// Cut `value` to at most `max` characters
pub fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
