//! PostgreSQL Repository Implementation

use crate::domain::entities::{ContactSubmission, NewContactSubmission};
use crate::domain::repository::ContactRepository;
use crate::error::ContactResult;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContactRepository for PgContactRepository {
    async fn create(&self, submission: &NewContactSubmission) -> ContactResult<ContactSubmission> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO contact_submissions (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(submission.name.as_str())
        .bind(submission.email.as_str())
        .bind(submission.message.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(ContactSubmission {
            id,
            name: submission.name.as_str().to_string(),
            email: submission.email.as_str().to_string(),
            message: submission.message.as_str().to_string(),
            created_at,
        })
    }
}
