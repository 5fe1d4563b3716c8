//! Record Pageview Use Case

use crate::application::config::{AnalyticsConfig, RATE_LIMIT_ENDPOINT};
use crate::domain::entities::{NewPageview, Pageview, RequestMetadata};
use crate::domain::repository::PageviewRepository;
use crate::error::AnalyticsResult;
use platform::rate_limit::RateLimiter;
use std::sync::Arc;

/// Input DTO for record pageview
#[derive(Debug, Clone)]
pub struct RecordPageviewInput {
    pub path: String,
    pub title: Option<String>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
    pub client_ip: Option<String>,
}

pub struct RecordPageviewUseCase<R>
where
    R: PageviewRepository,
{
    repo: Arc<R>,
    limiter: Arc<RateLimiter>,
    config: Arc<AnalyticsConfig>,
}

impl<R> RecordPageviewUseCase<R>
where
    R: PageviewRepository,
{
    pub fn new(repo: Arc<R>, limiter: Arc<RateLimiter>, config: Arc<AnalyticsConfig>) -> Self {
        Self {
            repo,
            limiter,
            config,
        }
    }

    pub async fn execute(&self, input: RecordPageviewInput) -> AnalyticsResult<Pageview> {
        let metadata = RequestMetadata::new(input.user_agent.as_deref(), input.client_ip.as_deref());
        let pageview = NewPageview::parse(
            &input.path,
            input.title.as_deref(),
            input.referrer.as_deref(),
            input.session_id.as_deref(),
            metadata,
        )?;

        self.limiter
            .enforce(
                RATE_LIMIT_ENDPOINT,
                input.client_ip.as_deref(),
                &self.config.rate_limit,
            )
            .await?;

        let stored = self.repo.create(&pageview).await?;

        tracing::debug!(pageview_id = stored.id, path = %stored.path, "Recorded pageview");

        Ok(stored)
    }
}
