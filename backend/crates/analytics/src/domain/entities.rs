//! Domain Entities

use crate::domain::value_objects::{
    IP_ADDRESS_MAX_LENGTH, PagePath, REFERRER_MAX_LENGTH, SESSION_ID_MAX_LENGTH, TITLE_MAX_LENGTH,
    USER_AGENT_MAX_LENGTH, optional_field, truncate_chars,
};
use crate::error::AnalyticsResult;
use chrono::{DateTime, Utc};

/// Who sent the request, as seen by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl RequestMetadata {
    /// Blank values become `None`; long values are cut to column width
    pub fn new(user_agent: Option<&str>, ip_address: Option<&str>) -> Self {
        let fit = |value: Option<&str>, max: usize| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| truncate_chars(v, max).to_string())
        };

        Self {
            user_agent: fit(user_agent, USER_AGENT_MAX_LENGTH),
            ip_address: fit(ip_address, IP_ADDRESS_MAX_LENGTH),
        }
    }
}

/// A validated pageview that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewPageview {
    pub path: PagePath,
    pub title: Option<String>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl NewPageview {
    pub fn parse(
        path: &str,
        title: Option<&str>,
        referrer: Option<&str>,
        session_id: Option<&str>,
        metadata: RequestMetadata,
    ) -> AnalyticsResult<Self> {
        Ok(Self {
            path: PagePath::new(path)?,
            title: optional_field("title", title, TITLE_MAX_LENGTH)?,
            referrer: optional_field("referrer", referrer, REFERRER_MAX_LENGTH)?,
            session_id: optional_field("session_id", session_id, SESSION_ID_MAX_LENGTH)?,
            metadata,
        })
    }
}

/// A stored pageview
#[derive(Debug, Clone)]
pub struct Pageview {
    pub id: i64,
    pub path: String,
    pub title: Option<String>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}
