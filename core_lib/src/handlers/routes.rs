//! Route table

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{contact::handle_contact, health, quote::handle_quote};
use crate::{
    config::AppConfig,
    middleware::{
        cache::response_cache,
        rate_limit::{rate_limit_middleware, RateLimiter},
    },
    AppState,
};

pub fn create_routes(state: &AppState, config: &AppConfig) -> Router<AppState> {
    let mut contact = Router::new().route("/api/contact", post(handle_contact));
    if config.rate_limit.enable {
        contact = contact.route_layer(middleware::from_fn_with_state(
            RateLimiter::new(&config.rate_limit),
            rate_limit_middleware,
        ));
    }

    let quote = Router::new()
        .route("/api/quote", get(handle_quote))
        .route_layer(middleware::from_fn_with_state(
            state.quote_cache.clone(),
            response_cache,
        ));

    Router::new()
        .route("/", get(health::handle_root))
        .route("/health", get(health::handle_health))
        .route("/metrics", get(health::handle_metrics))
        .merge(contact)
        .merge(quote)
}
