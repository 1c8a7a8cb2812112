//! Resend HTTP API client

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{DeliveryError, DeliveryReceipt, EmailSender, OutgoingEmail};
use crate::config::EmailConfig;

#[derive(Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderError {
    status_code: Option<u16>,
    name: Option<String>,
    message: Option<String>,
}

impl ResendClient {
    pub fn new(http: reqwest::Client, config: &EmailConfig) -> Self {
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| DeliveryError::Rejected {
            status: StatusCode::UNAUTHORIZED.as_u16(),
            name: "missing_api_key".to_string(),
            message: "Missing API key in the authorization header".to_string(),
        })?;

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let receipt = match response.json::<SendEmailResponse>().await {
                Ok(body) => DeliveryReceipt { id: body.id },
                Err(e) => {
                    warn!("Email accepted but response body was unreadable: {}", e);
                    DeliveryReceipt { id: None }
                }
            };
            debug!("Email accepted by provider: {:?}", receipt.id);
            return Ok(receipt);
        }

        let fallback_message = status
            .canonical_reason()
            .unwrap_or("Unknown provider error")
            .to_string();

        let err = match response.json::<ProviderError>().await {
            Ok(body) => DeliveryError::Rejected {
                status: body.status_code.unwrap_or(status.as_u16()),
                name: body.name.unwrap_or_else(|| "application_error".to_string()),
                message: body.message.unwrap_or(fallback_message),
            },
            Err(_) => DeliveryError::Rejected {
                status: status.as_u16(),
                name: "application_error".to_string(),
                message: fallback_message,
            },
        };

        Err(err)
    }
}
