//! Liveness, service info and metrics handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

pub async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "metrics": "/metrics",
            "contact": "/api/contact",
            "quote": "/api/quote"
        }
    }))
}

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": state.version,
        "quote_cache_entries": state.quote_cache.store().len(),
    }))
}

pub async fn handle_metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "requests": state.metrics.snapshot(),
        "quote_cache": state.quote_cache.store().stats(),
    }))
}
