//! Slack notifier for new submissions

use crate::domain::entities::ContactSubmission;
use crate::domain::repository::ContactNotifier;
use crate::error::{ContactError, ContactResult};
use platform::slack::{Delivery, SlackWebhook};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct SlackContactNotifier {
    webhook: SlackWebhook,
}

impl SlackContactNotifier {
    pub fn new(webhook: SlackWebhook) -> Self {
        Self { webhook }
    }
}

impl ContactNotifier for SlackContactNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> ContactResult<()> {
        let delivery = self
            .webhook
            .send(&build_payload(submission))
            .await
            .map_err(|e| ContactError::Notification(e.to_string()))?;

        if delivery == Delivery::Sent {
            tracing::debug!(
                contact_submission_id = submission.id,
                "Sent Slack notification"
            );
        }
        Ok(())
    }
}

/// Block Kit message: header, name/email fields, then the message body
pub fn build_payload(submission: &ContactSubmission) -> Value {
    json!({
        "text": "New contact form submission",
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": "*New contact form submission*",
                },
            },
            {
                "type": "section",
                "fields": [
                    { "type": "mrkdwn", "text": format!("*Name:*\n{}", submission.name) },
                    { "type": "mrkdwn", "text": format!("*Email:*\n{}", submission.email) },
                ],
            },
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("*Message:*\n{}", submission.message),
                },
            },
        ],
    })
}
