//! Outbound email delivery

pub mod client;
pub mod templates;

pub use client::ResendClient;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// A fully rendered message ready to hand to a delivery provider.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub id: Option<String>,
}

#[derive(Error, Debug, Clone)]
pub enum DeliveryError {
    #[error("Email provider rejected the message ({status} {name}): {message}")]
    Rejected {
        status: u16,
        name: String,
        message: String,
    },

    #[error("Email transport failed: {0}")]
    Transport(String),
}

impl DeliveryError {
    /// Structured error object in the shape the provider reports it.
    pub fn to_payload(&self) -> Value {
        match self {
            DeliveryError::Rejected {
                status,
                name,
                message,
            } => json!({
                "name": name,
                "message": message,
                "statusCode": status,
            }),
            DeliveryError::Transport(message) => json!({
                "name": "application_error",
                "message": message,
                "statusCode": null,
            }),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_payload_shape() {
        let err = DeliveryError::Rejected {
            status: 422,
            name: "validation_error".to_string(),
            message: "Invalid `to` field".to_string(),
        };

        assert_eq!(
            err.to_payload(),
            json!({
                "name": "validation_error",
                "message": "Invalid `to` field",
                "statusCode": 422,
            })
        );
    }

    #[test]
    fn test_transport_payload_shape() {
        let payload = DeliveryError::Transport("connection reset".to_string()).to_payload();
        assert_eq!(payload["name"], "application_error");
        assert_eq!(payload["message"], "connection reset");
        assert!(payload["statusCode"].is_null());
    }

    #[test]
    fn test_reply_to_omitted_when_absent() {
        let email = OutgoingEmail {
            from: "Shop <shop@example.com>".to_string(),
            to: vec!["ana@example.com".to_string()],
            reply_to: None,
            subject: "Hola".to_string(),
            html: "<p>Hola</p>".to_string(),
            text: "Hola".to_string(),
        };

        let body = serde_json::to_value(&email).unwrap();
        assert!(body.get("reply_to").is_none());
        assert_eq!(body["to"], json!(["ana@example.com"]));
    }
}
