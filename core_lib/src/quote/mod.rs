//! Daily quote: one upstream quote, translated, stamped with today's date

pub mod deepl;
pub mod zenquotes;

pub use deepl::DeepLClient;
pub use zenquotes::ZenQuotesClient;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const QUOTE_SOURCE: &str = "ZenQuotes + DeepL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Translated(String),
    /// The provider answered but not with a usable translation.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub original: String,
    pub translated: String,
    pub author: String,
    pub source: String,
    pub date: NaiveDate,
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("no_quote")]
    NoQuote,

    #[error("missing_translation_key")]
    MissingTranslationKey,

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },
}

impl QuoteError {
    pub fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        QuoteError::Transport { provider, message }
    }

    /// Misconfiguration rather than a transient upstream problem.
    pub fn is_config(&self) -> bool {
        matches!(self, QuoteError::MissingTranslationKey)
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_random(&self) -> Result<Quote, QuoteError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<Translation, QuoteError>;
}

#[derive(Clone)]
pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    translator: Arc<dyn Translator>,
    target_lang: String,
}

impl QuoteService {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        translator: Arc<dyn Translator>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            translator,
            target_lang: target_lang.into(),
        }
    }

    pub async fn daily_quote(&self) -> Result<QuoteResult, QuoteError> {
        let quote = self.provider.fetch_random().await?;
        debug!("Fetched quote by {}", quote.author);

        let translated = match self.translator.translate(&quote.text, &self.target_lang).await? {
            Translation::Translated(text) => text,
            Translation::Fallback => {
                warn!("Translation unavailable, serving original quote text");
                quote.text.clone()
            }
        };

        Ok(QuoteResult {
            original: quote.text,
            translated,
            author: quote.author,
            source: QUOTE_SOURCE.to_string(),
            date: Utc::now().date_naive(),
        })
    }
}
