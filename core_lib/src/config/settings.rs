use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub quote: QuoteConfig,
    pub http_client: HttpClientConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub from: String,
    pub operator_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    pub site_url: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub quote_url: String,
    pub translation_url: String,
    #[serde(default, skip_serializing)]
    pub translation_api_key: Option<String>,
    pub target_lang: String,
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_size: usize,
    pub cleanup_interval_seconds: u64,
    pub enable_stats: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enable: bool,
    pub max_requests: usize,
    pub window_seconds: u64,
    /// Header carrying the client address when running behind a trusted
    /// proxy or CDN, e.g. `x-forwarded-for`. The leftmost entry is used.
    #[serde(default)]
    pub client_ip_header: Option<String>,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .field("operator_address", &self.operator_address)
            .finish()
    }
}

impl fmt::Debug for QuoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteConfig")
            .field("quote_url", &self.quote_url)
            .field("translation_url", &self.translation_url)
            .field(
                "translation_api_key",
                &self.translation_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("target_lang", &self.target_lang)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            email: EmailConfig::default(),
            contact: ContactConfig::default(),
            quote: QuoteConfig::default(),
            http_client: HttpClientConfig::default(),
            cache: CacheConfig::default(),
            cors: CorsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.resend.com".to_string(),
            api_key: None,
            from: "Essence Burn <onboarding@resend.dev>".to_string(),
            operator_address: "contacto@essenceburn.com".to_string(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            site_url: "https://essenceburn.com".to_string(),
            webhook_url: None,
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            quote_url: "https://zenquotes.io/api/random".to_string(),
            translation_url: "https://api-free.deepl.com/v2/translate".to_string(),
            translation_api_key: None,
            target_lang: "ES".to_string(),
            cache_ttl_seconds: 86_400,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: concat!("essence-burn/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 128,
            cleanup_interval_seconds: 300,
            enable_stats: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://essenceburn.com".to_string(),
                "https://www.essenceburn.com".to_string(),
            ],
            max_age_seconds: 3600,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_requests: 5,
            window_seconds: 60,
            client_ip_header: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new("config.toml");
        Self::load_from(path.exists().then_some(path))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("email.api_key", std::env::var("RESEND_API_KEY").ok())?
            .set_override_option(
                "quote.translation_api_key",
                std::env::var("DEEPL_API_KEY").ok(),
            )?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.email.api_base_url.is_empty() {
            return Err(ConfigError::Message(
                "Email API base URL cannot be empty".to_string(),
            ));
        }

        if self.email.from.trim().is_empty() {
            return Err(ConfigError::Message(
                "Email sender address cannot be empty".to_string(),
            ));
        }

        if self.email.operator_address.trim().is_empty() {
            return Err(ConfigError::Message(
                "Operator address cannot be empty".to_string(),
            ));
        }

        if self.email.api_key.is_none() {
            tracing::warn!("RESEND_API_KEY is not set - contact emails will be rejected");
        }

        if self.quote.quote_url.is_empty() || self.quote.translation_url.is_empty() {
            return Err(ConfigError::Message(
                "Quote and translation URLs cannot be empty".to_string(),
            ));
        }

        if self.quote.cache_ttl_seconds == 0 {
            return Err(ConfigError::Message(
                "Quote cache TTL must be greater than 0".to_string(),
            ));
        }

        if self.http_client.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "HTTP client timeout must be greater than 0".to_string(),
            ));
        }

        if self.cache.max_size == 0 {
            return Err(ConfigError::Message(
                "Cache max size must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.enable
            && (self.rate_limit.max_requests == 0 || self.rate_limit.window_seconds == 0)
        {
            return Err(ConfigError::Message(
                "Rate limit requires a positive request count and window".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl HttpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl QuoteConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}
