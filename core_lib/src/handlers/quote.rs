//! Daily quote endpoint

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{error::Result, AppState};

pub async fn handle_quote(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let quote = state.quotes.daily_quote().await?;
    info!("GET /api/quote - fresh quote by {}", quote.author);

    let cache_control = HeaderValue::from_str(&format!(
        "public, s-maxage={}, stale-while-revalidate",
        state.quote_ttl.as_secs()
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("public"));

    Ok(([(header::CACHE_CONTROL, cache_control)], Json(quote)))
}
