//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::contact::ValidationError;
use crate::email::DeliveryError;
use crate::quote::QuoteError;

pub type Result<T> = std::result::Result<T, AppError>;

pub const CONTACT_FAILURE_MESSAGE: &str = "Error al enviar el mensaje";
pub const NO_QUOTE_MESSAGE: &str = "No quote found";
pub const QUOTE_FAILURE_MESSAGE: &str = "Error fetching daily quote";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Unreadable contact body: {0}")]
    ContactBody(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error): (StatusCode, Value) = match self {
            AppError::Validation(err) => {
                tracing::debug!("Rejected contact submission: {}", err);
                (StatusCode::BAD_REQUEST, Value::from(err.user_message()))
            }
            AppError::Delivery(err) => {
                tracing::warn!("Email delivery rejected: {}", err);
                (StatusCode::BAD_REQUEST, err.to_payload())
            }
            AppError::Quote(QuoteError::NoQuote) => {
                tracing::error!(kind = "upstream", "Quote provider returned no usable quote");
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(NO_QUOTE_MESSAGE))
            }
            AppError::Quote(err) if err.is_config() => {
                tracing::error!(kind = "config", "Daily quote unavailable: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(QUOTE_FAILURE_MESSAGE))
            }
            AppError::Quote(err) => {
                tracing::error!(kind = "upstream", "Daily quote unavailable: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(QUOTE_FAILURE_MESSAGE))
            }
            AppError::ContactBody(detail) => {
                tracing::error!("Contact form error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(CONTACT_FAILURE_MESSAGE))
            }
            AppError::Internal(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from("Internal server error"))
            }
        };

        (status, Json(json!({ "error": error }))).into_response()
    }
}
