//! Follow-up actions run after a contact submission has been relayed

use async_trait::async_trait;
use serde_json::json;

use super::ContactMessage;

/// Runs after the operator has been notified. Failures are logged by the
/// caller and never reach the visitor.
#[async_trait]
pub trait ContactHook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_submitted(&self, message: &ContactMessage) -> anyhow::Result<()>;
}

/// Posts a one-line summary to a chat webhook (Slack/Discord compatible).
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    fn summary(message: &ContactMessage) -> String {
        format!(
            "🆕 Nuevo mensaje de contacto de {} ({})\nAsunto: {}",
            message.name, message.email, message.subject
        )
    }
}

#[async_trait]
impl ContactHook for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn on_submitted(&self, message: &ContactMessage) -> anyhow::Result<()> {
        self.http
            .post(&self.url)
            .json(&json!({ "text": Self::summary(message) }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
