//! Contact submission wire type and its validated form

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Body of `POST /api/contact` exactly as the site's form sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub subscribe: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub subscribe: bool,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing_fields")]
    MissingFields,

    #[error("invalid_email")]
    InvalidEmail,
}

impl ValidationError {
    /// Message shown to the visitor.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Campos requeridos faltantes",
            ValidationError::InvalidEmail => "Email inválido",
        }
    }
}

/// Present and non-empty. Values are kept as sent.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn optional(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    email.is_ascii() && EMAIL_REGEX.is_match(email)
}

impl ContactMessage {
    pub fn parse(request: ContactRequest) -> Result<Self, ValidationError> {
        let name = required(request.name);
        let email = required(request.email);
        let subject = required(request.subject);
        let message = required(request.message);

        let (Some(name), Some(email), Some(subject), Some(message)) = (name, email, subject, message)
        else {
            return Err(ValidationError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            name,
            email,
            phone: optional(request.phone),
            subject,
            message,
            subscribe: request.subscribe.unwrap_or(false),
        })
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
