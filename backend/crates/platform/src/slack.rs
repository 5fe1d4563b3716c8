//! Slack incoming-webhook client
//!
//! Best-effort delivery: a bounded number of attempts with a short linear
//! backoff. Callers decide whether a failure matters.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send Slack notification after {attempts} attempt(s): {last}")]
    Delivery { attempts: u32, last: String },
}

/// What happened to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No webhook configured
    Skipped,
}

#[derive(Debug, Clone)]
pub struct SlackWebhook {
    url: Option<String>,
    client: reqwest::Client,
    max_attempts: u32,
}

impl SlackWebhook {
    pub fn new(url: Option<String>) -> Result<Self, WebhookError> {
        Self::with_options(url, DEFAULT_TIMEOUT, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_options(
        url: Option<String>,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WebhookError::Client)?;

        Ok(Self {
            url: url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            client,
            max_attempts: max_attempts.max(1),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// POST `payload` as JSON. Non-2xx responses count as failed attempts.
    pub async fn send(&self, payload: &serde_json::Value) -> Result<Delivery, WebhookError> {
        let Some(url) = self.url.as_deref() else {
            warn!("SLACK_WEBHOOK_URL is not configured; skipping Slack notification");
            return Ok(Delivery::Skipped);
        };

        let mut last = String::new();
        for attempt in 1..=self.max_attempts {
            let result = self
                .client
                .post(url)
                .json(payload)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            match result {
                Ok(_) => return Ok(Delivery::Sent),
                Err(e) => {
                    debug!(attempt, error = %e, "Slack webhook attempt failed");
                    last = e.to_string();
                    if attempt < self.max_attempts {
                        sleep(RETRY_BACKOFF * attempt).await;
                    }
                }
            }
        }

        Err(WebhookError::Delivery {
            attempts: self.max_attempts,
            last,
        })
    }
}
