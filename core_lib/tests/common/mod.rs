#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use essence_core::{create_app_with_config, AppConfig, AppState};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub email_server: MockServer,
    pub quote_server: MockServer,
    pub translation_server: MockServer,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body should be JSON")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut AppConfig)) -> TestApp {
    let email_server = MockServer::start().await;
    let quote_server = MockServer::start().await;
    let translation_server = MockServer::start().await;

    let mut config = AppConfig::default();
    config.email.api_base_url = email_server.uri();
    config.email.api_key = Some("re_test".to_string());
    config.email.operator_address = "ops@essenceburn.test".to_string();
    config.quote.quote_url = format!("{}/api/random", quote_server.uri());
    config.quote.translation_url = format!("{}/v2/translate", translation_server.uri());
    config.quote.translation_api_key = Some("deepl-test".to_string());
    config.http_client.timeout_seconds = 2;
    config.rate_limit.enable = false;
    customize(&mut config);

    let state = AppState::from_config(&config).expect("Failed to build application state");
    let router = create_app_with_config(state, &config);

    TestApp {
        router,
        config,
        email_server,
        quote_server,
        translation_server,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn post_contact_raw(&self, body: impl Into<Body>) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/contact")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
    }

    pub async fn post_contact(&self, body: &Value) -> TestResponse {
        self.post_contact_raw(body.to_string()).await
    }

    pub async fn get_quote(&self) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri("/api/quote")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}
