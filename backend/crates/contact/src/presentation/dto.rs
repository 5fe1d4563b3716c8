//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request for POST /v1/contact
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContactSubmissionRequest {
    #[schema(max_length = 120)]
    pub name: String,
    #[schema(max_length = 320)]
    pub email: String,
    #[schema(max_length = 5000)]
    pub message: String,
    /// Honeypot; real visitors leave it empty
    #[serde(default)]
    pub website: Option<String>,
}

/// Response for POST /v1/contact
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactSubmissionResponse {
    pub ok: bool,
    pub id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}
