//! API DTOs (Data Transfer Objects)

use serde::Deserialize;
use utoipa::ToSchema;

/// Request for POST /v1/analytics/pageview
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PageviewRequest {
    #[schema(max_length = 2048)]
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}
