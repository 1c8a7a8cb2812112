//! Whole-response cache for idempotent GET routes

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::CacheManager;

const MAX_CACHED_BODY: usize = 1024 * 1024;
const KEY_PREFIX: &str = "http_cache";

#[derive(Debug, Clone)]
pub struct CachedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

/// Replays successful responses for `ttl`, keyed by method and path.
#[derive(Clone)]
pub struct ResponseCache {
    store: CacheManager<CachedResponse>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: CacheManager<CachedResponse>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &CacheManager<CachedResponse> {
        &self.store
    }
}

pub async fn response_cache(
    State(cache): State<ResponseCache>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(&request);

    if let Some(cached) = cache.store.get(&key) {
        debug!("Serving {} from response cache", key);
        return replay(cached, "HIT");
    }

    let response = next.run(request).await;
    if !response.status().is_success() {
        return with_cache_status(response, "MISS");
    }

    let (parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, MAX_CACHED_BODY).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Response for {} not cacheable: {}", key, e);
            let mut response = Response::from_parts(parts, Body::empty());
            response.headers_mut().insert(
                axum::http::header::CONTENT_LENGTH,
                HeaderValue::from_static("0"),
            );
            return with_cache_status(response, "MISS");
        }
    };

    let headers = parts
        .headers
        .iter()
        .filter(|(name, _)| should_cache_header(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let cached = CachedResponse {
        status: parts.status,
        headers,
        body: body.clone(),
    };
    cache.store.set_with_ttl(&key, cached, Some(cache.ttl));
    debug!("Cached response for {} ({} bytes)", key, body.len());

    with_cache_status(Response::from_parts(parts, Body::from(body)), "MISS")
}

/// One entry per route; the query string is not part of the key.
fn cache_key<B>(request: &Request<B>) -> String {
    format!(
        "{}:{}:{}",
        KEY_PREFIX,
        request.method().as_str(),
        request.uri().path()
    )
}

fn replay(cached: CachedResponse, status: &'static str) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    *response.status_mut() = cached.status;
    *response.headers_mut() = cached.headers;
    with_cache_status(response, status)
}

fn with_cache_status(mut response: Response, status: &'static str) -> Response {
    response
        .headers_mut()
        .insert("x-cache", HeaderValue::from_static(status));
    response
}

fn should_cache_header(header_name: &str) -> bool {
    !matches!(
        header_name,
        "date" | "server" | "x-request-id" | "set-cookie" | "x-cache"
    )
}
