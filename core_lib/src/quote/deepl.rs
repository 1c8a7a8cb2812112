use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::{QuoteError, Translation, Translator};

const PROVIDER: &str = "deepl";

#[derive(Clone)]
pub struct DeepLClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
}

impl DeepLClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

fn read_translation(body: &[u8]) -> Option<String> {
    let response: TranslateResponse = serde_json::from_slice(body).ok()?;
    response.translations.into_iter().next().map(|t| t.text)
}

#[async_trait]
impl Translator for DeepLClient {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<Translation, QuoteError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(QuoteError::MissingTranslationKey)?;

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .form(&[
                ("auth_key", api_key),
                ("text", text),
                ("target_lang", target_lang),
            ])
            .send()
            .await
            .map_err(|e| QuoteError::transport(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| QuoteError::transport(PROVIDER, e))?;

        match read_translation(&body) {
            Some(translated) => Ok(Translation::Translated(translated)),
            None => {
                warn!(status = status.as_u16(), "Unexpected translation response shape");
                Ok(Translation::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_translation() {
        let body = r#"{"translations":[{"detected_source_language":"EN","text":"Sé tú mismo."}]}"#;
        assert_eq!(read_translation(body.as_bytes()).as_deref(), Some("Sé tú mismo."));
    }

    #[test]
    fn test_read_translation_rejects_other_shapes() {
        assert_eq!(read_translation(br#"{"translations":[]}"#), None);
        assert_eq!(read_translation(br#"{"message":"Wrong endpoint"}"#), None);
        assert_eq!(read_translation(b"<html>Forbidden</html>"), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = DeepLClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/v2/translate",
            Some("  ".to_string()),
        );

        let err = client.translate("Be yourself.", "ES").await.unwrap_err();
        assert!(matches!(err, QuoteError::MissingTranslationKey));
    }
}
