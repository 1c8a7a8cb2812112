//! Contact form relay: operator notification plus visitor confirmation

pub mod hooks;
pub mod message;

pub use hooks::{ContactHook, WebhookNotifier};
pub use message::{ContactMessage, ContactRequest, ValidationError};

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::config::{ContactConfig, EmailConfig};
use crate::email::{templates, DeliveryError, EmailSender, OutgoingEmail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactOutcome {
    pub submission_id: Uuid,
    pub notification_id: Option<String>,
    pub confirmation_sent: bool,
}

#[derive(Clone)]
pub struct ContactService {
    sender: Arc<dyn EmailSender>,
    from: String,
    operator_address: String,
    site_url: String,
    hooks: Vec<Arc<dyn ContactHook>>,
}

impl ContactService {
    pub fn new(sender: Arc<dyn EmailSender>, email: &EmailConfig, contact: &ContactConfig) -> Self {
        Self {
            sender,
            from: email.from.clone(),
            operator_address: email.operator_address.clone(),
            site_url: contact.site_url.clone(),
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn ContactHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    fn site_host(&self) -> &str {
        self.site_url
            .split("://")
            .last()
            .unwrap_or(&self.site_url)
            .trim_end_matches('/')
    }

    fn notification_for(&self, message: &ContactMessage) -> OutgoingEmail {
        let rendered = templates::operator_notification(message, self.site_host(), Utc::now());
        OutgoingEmail {
            from: self.from.clone(),
            to: vec![self.operator_address.clone()],
            reply_to: Some(message.email.clone()),
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        }
    }

    fn confirmation_for(&self, message: &ContactMessage) -> OutgoingEmail {
        let rendered = templates::visitor_confirmation(message, &self.site_url);
        OutgoingEmail {
            from: self.from.clone(),
            to: vec![message.email.clone()],
            reply_to: None,
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        }
    }

    /// Relays a validated submission.
    ///
    /// Fails only when the operator notification is not accepted; in that
    /// case no confirmation is sent. A failed confirmation is logged and
    /// reported through [`ContactOutcome::confirmation_sent`].
    pub async fn submit(&self, message: ContactMessage) -> Result<ContactOutcome, DeliveryError> {
        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("contact_submission", %submission_id);

        async move {
            let receipt = self
                .sender
                .send(&self.notification_for(&message))
                .await
                .map_err(|e| {
                    error!("Operator notification failed: {}", e);
                    e
                })?;
            info!("Operator notified (provider id: {:?})", receipt.id);

            let confirmation_sent = match self.sender.send(&self.confirmation_for(&message)).await {
                Ok(_) => true,
                Err(e) => {
                    warn!("Confirmation email to visitor failed: {}", e);
                    false
                }
            };

            self.run_hooks(message);

            Ok(ContactOutcome {
                submission_id,
                notification_id: receipt.id,
                confirmation_sent,
            })
        }
        .instrument(span)
        .await
    }

    fn run_hooks(&self, message: ContactMessage) {
        if self.hooks.is_empty() {
            return;
        }

        let hooks = self.hooks.clone();
        let message = Arc::new(message);
        tokio::spawn(
            async move {
                for hook in hooks {
                    if let Err(e) = hook.on_submitted(&message).await {
                        warn!("Contact hook '{}' failed: {:#}", hook.name(), e);
                    }
                }
            }
            .in_current_span(),
        );
    }
}
