//! PostgreSQL Repository Implementation

use crate::domain::entities::{NewPageview, Pageview};
use crate::domain::repository::PageviewRepository;
use crate::error::AnalyticsResult;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgPageviewRepository {
    pool: PgPool,
}

impl PgPageviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PageviewRepository for PgPageviewRepository {
    async fn create(&self, pageview: &NewPageview) -> AnalyticsResult<Pageview> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO pageviews (
                path,
                title,
                referrer,
                session_id,
                user_agent,
                ip_address
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at
            "#,
        )
        .bind(pageview.path.as_str())
        .bind(pageview.title.as_deref())
        .bind(pageview.referrer.as_deref())
        .bind(pageview.session_id.as_deref())
        .bind(pageview.metadata.user_agent.as_deref())
        .bind(pageview.metadata.ip_address.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(Pageview {
            id,
            path: pageview.path.as_str().to_string(),
            title: pageview.title.clone(),
            referrer: pageview.referrer.clone(),
            session_id: pageview.session_id.clone(),
            user_agent: pageview.metadata.user_agent.clone(),
            ip_address: pageview.metadata.ip_address.clone(),
            created_at,
        })
    }
}
