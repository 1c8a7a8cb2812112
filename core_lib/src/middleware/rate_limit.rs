//! Per-client sliding-window rate limiting

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use tracing::warn;

use crate::config::RateLimitConfig;

#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
    client_ip_header: Option<HeaderName>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let client_ip_header = config.client_ip_header.as_deref().and_then(|name| {
            match HeaderName::from_bytes(name.trim().as_bytes()) {
                Ok(header) => Some(header),
                Err(_) => {
                    warn!("Ignoring invalid client IP header name: {}", name);
                    None
                }
            }
        });

        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_seconds),
            client_ip_header,
        }
    }

    /// Client address from the configured proxy header, else the peer address.
    pub fn client_ip(&self, headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
        self.client_ip_header
            .as_ref()
            .and_then(|name| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.trim().parse().ok())
            .or(peer)
    }

    pub fn check(&self, ip: IpAddr) -> Result<usize, RateLimitError> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<usize, RateLimitError> {
        let mut requests = self.requests.lock();

        // Drop clients whose whole window has passed.
        requests.retain(|_, entries| {
            entries.retain(|&instant| now.duration_since(instant) < self.window);
            !entries.is_empty()
        });

        let entries = requests.entry(ip).or_default();

        if entries.len() >= self.max_requests {
            let oldest = entries.first().copied().unwrap_or(now);
            let reset_in = self.window.saturating_sub(now.duration_since(oldest));

            return Err(RateLimitError {
                retry_after_seconds: reset_in.as_secs().max(1),
                limit: self.max_requests,
            });
        }

        entries.push(now);
        Ok(self.max_requests - entries.len())
    }
}

#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after_seconds: u64,
    pub limit: usize,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "Demasiadas solicitudes, intentá de nuevo más tarde",
            "retry_after": self.retry_after_seconds,
        }));

        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        let headers = response.headers_mut();
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
        headers.insert("retry-after", HeaderValue::from(self.retry_after_seconds));

        response
    }
}

/// Clients without a known address (e.g. in-process callers) are not limited.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let Some(client) = limiter.client_ip(request.headers(), peer) else {
        return Ok(next.run(request).await);
    };

    let remaining = limiter.check(client).map_err(|e| {
        warn!(client = %client, "Rate limit exceeded on {}", request.uri().path());
        e
    })?;

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(limiter.max_requests));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));

    Ok(response)
}
