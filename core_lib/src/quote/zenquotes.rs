use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{Quote, QuoteError, QuoteProvider};

const PROVIDER: &str = "zenquotes";

#[derive(Clone)]
pub struct ZenQuotesClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

impl ZenQuotesClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

/// Takes the first entry of a `[{ "q": ..., "a": ... }, ...]` payload.
fn first_quote(body: &[u8]) -> Result<Quote, QuoteError> {
    let entries: Vec<Value> = serde_json::from_slice(body).map_err(|_| QuoteError::NoQuote)?;
    let first = entries.into_iter().next().ok_or(QuoteError::NoQuote)?;
    let quote: ZenQuote = serde_json::from_value(first).map_err(|_| QuoteError::NoQuote)?;

    let text = quote.q.trim();
    if text.is_empty() {
        return Err(QuoteError::NoQuote);
    }

    Ok(Quote {
        text: text.to_string(),
        author: quote.a.trim().to_string(),
    })
}

#[async_trait]
impl QuoteProvider for ZenQuotesClient {
    async fn fetch_random(&self) -> Result<Quote, QuoteError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| QuoteError::transport(PROVIDER, e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| QuoteError::transport(PROVIDER, e))?;

        first_quote(&body)
    }
}
