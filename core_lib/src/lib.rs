//! Core library for the Essence Burn storefront backend: the contact relay,
//! the daily quote proxy, and the HTTP plumbing around them.

pub mod cache;
pub mod config;
pub mod contact;
pub mod email;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod quote;

pub use cache::{CacheManager, CacheStats};
pub use config::AppConfig;
pub use contact::{ContactHook, ContactMessage, ContactService, WebhookNotifier};
pub use email::{EmailSender, ResendClient};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use metrics::MetricsCollector;
pub use middleware::cache::ResponseCache;
pub use quote::{DeepLClient, QuoteService, ZenQuotesClient};

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::{self as axum_middleware, Next},
    response::Response,
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub contact: ContactService,
    pub quotes: QuoteService,
    pub quote_cache: ResponseCache,
    pub quote_ttl: Duration,
    pub metrics: MetricsCollector,
}

impl AppState {
    pub fn new(contact: ContactService, quotes: QuoteService, config: &AppConfig) -> Self {
        let quote_cache = ResponseCache::new(
            CacheManager::new(config.cache.clone()),
            config.quote.cache_ttl(),
        );

        Self {
            app_name: "Essence Burn API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact,
            quotes,
            quote_cache,
            quote_ttl: config.quote.cache_ttl(),
            metrics: MetricsCollector::new(),
        }
    }

    /// Wires the production providers from configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_client.timeout())
            .user_agent(config.http_client.user_agent.as_str())
            .build()?;

        let sender = Arc::new(ResendClient::new(http.clone(), &config.email));
        let mut contact = ContactService::new(sender, &config.email, &config.contact);
        if let Some(url) = &config.contact.webhook_url {
            info!("Contact webhook notifications enabled");
            contact = contact.with_hook(Arc::new(WebhookNotifier::new(http.clone(), url.clone())));
        }

        let quotes = QuoteService::new(
            Arc::new(ZenQuotesClient::new(http.clone(), config.quote.quote_url.clone())),
            Arc::new(DeepLClient::new(
                http,
                config.quote.translation_url.clone(),
                config.quote.translation_api_key.clone(),
            )),
            config.quote.target_lang.clone(),
        );

        Ok(Self::new(contact, quotes, config))
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    create_routes(&state, config)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    state
        .metrics
        .record_response(&method, &path, elapsed_ms, response.status().as_u16());

    response
}

pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
