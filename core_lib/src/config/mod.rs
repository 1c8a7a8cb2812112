//! Application configuration

pub mod settings;

pub use settings::{
    AppConfig, CacheConfig, ContactConfig, CorsConfig, EmailConfig, HttpClientConfig,
    QuoteConfig, RateLimitConfig, ServerConfig,
};
