//! Generic HTTP webhook notifier — the reference delivery channel.
//!
//! Posts fired reminders as JSON to a configured endpoint. Chat-platform
//! adapters (which also attach the rendered timeline picture) implement
//! [`Notifier`] outside this repo.

use serde::Serialize;

use crate::templating::{format_reminder, validate_template};
use crate::traits::{Notifier, NotifyError, Reminder};

/// JSON payload delivered to the webhook endpoint.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    tenant: &'a str,
    trigger_at: String,
    starts_at: String,
    activities: &'a [String],
    /// Rendered human-readable message.
    message: String,
}

/// Delivers reminders as JSON over HTTP POST to a configured endpoint.
#[derive(Debug)]
pub struct WebhookNotifier {
    /// Target URL.
    url: String,
    /// Optional minijinja template overriding the default message body.
    message_template: Option<String>,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier.
    ///
    /// Template syntax is validated at construction time; an invalid
    /// template produces a [`NotifyError::Template`] error.
    pub fn new(url: String, message_template: Option<String>) -> Result<Self, NotifyError> {
        if let Some(ref tmpl) = message_template {
            validate_template(tmpl)?;
        }
        Ok(Self {
            url,
            message_template,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    /// Deliver a reminder as a JSON payload to the configured URL.
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        let message = format_reminder(reminder, self.message_template.as_deref())?;
        let payload = WebhookPayload {
            tenant: &reminder.tenant,
            trigger_at: reminder.trigger_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            starts_at: reminder.starts_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            activities: &reminder.activities,
            message,
        };

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}
