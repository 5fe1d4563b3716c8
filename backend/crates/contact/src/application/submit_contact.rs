//! Submit Contact Use Case

use crate::application::config::{ContactConfig, RATE_LIMIT_ENDPOINT};
use crate::domain::entities::{ContactSubmission, NewContactSubmission};
use crate::domain::repository::{ContactNotifier, ContactRepository};
use crate::domain::value_objects::Honeypot;
use crate::error::ContactResult;
use platform::rate_limit::RateLimiter;
use std::sync::Arc;

/// Input DTO for submit contact
#[derive(Debug, Clone)]
pub struct SubmitContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
    pub website: Option<String>,
    pub client_ip: Option<String>,
}

#[derive(Debug, Clone)]
pub enum SubmitContactOutput {
    Stored(ContactSubmission),
    /// Honeypot was filled; acknowledged without storing
    Discarded,
}

/// Submit Contact Use Case
pub struct SubmitContactUseCase<R, N>
where
    R: ContactRepository,
    N: ContactNotifier,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    limiter: Arc<RateLimiter>,
    config: Arc<ContactConfig>,
}

impl<R, N> SubmitContactUseCase<R, N>
where
    R: ContactRepository,
    N: ContactNotifier,
{
    pub fn new(
        repo: Arc<R>,
        notifier: Arc<N>,
        limiter: Arc<RateLimiter>,
        config: Arc<ContactConfig>,
    ) -> Self {
        Self {
            repo,
            notifier,
            limiter,
            config,
        }
    }

    pub async fn execute(&self, input: SubmitContactInput) -> ContactResult<SubmitContactOutput> {
        let submission = NewContactSubmission::parse(&input.name, &input.email, &input.message)?;
        let honeypot = Honeypot::new(input.website.as_deref())?;

        // Rejected payloads never reach the counter
        self.limiter
            .enforce(
                RATE_LIMIT_ENDPOINT,
                input.client_ip.as_deref(),
                &self.config.rate_limit,
            )
            .await?;

        if honeypot.is_triggered() {
            tracing::info!(
                client_ip = input.client_ip.as_deref().unwrap_or("unknown"),
                "Contact honeypot triggered; discarding submission"
            );
            return Ok(SubmitContactOutput::Discarded);
        }

        let stored = self.repo.create(&submission).await?;

        tracing::info!(contact_submission_id = stored.id, "Stored contact submission");

        if let Err(e) = self.notifier.notify(&stored).await {
            tracing::error!(
                error = %e,
                contact_submission_id = stored.id,
                "Failed to send Slack notification"
            );
        }

        Ok(SubmitContactOutput::Stored(stored))
    }
}
