mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use common::{spawn_app, spawn_app_with};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn zen_quote() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([
        {"q": "Be yourself; everyone else is already taken.", "a": "Oscar Wilde", "h": "<blockquote>…</blockquote>"}
    ]))
}

fn deepl_translation() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "translations": [
            {"detected_source_language": "EN", "text": "Sé tú mismo; los demás ya están ocupados."}
        ]
    }))
}

#[tokio::test]
async fn quote_returns_translated_quote_of_the_day() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .expect(1)
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .and(body_string_contains("target_lang=ES"))
        .and(body_string_contains("auth_key=deepl-test"))
        .respond_with(deepl_translation())
        .expect(1)
        .mount(&app.translation_server)
        .await;

    let response = app.get_quote().await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({
            "original": "Be yourself; everyone else is already taken.",
            "translated": "Sé tú mismo; los demás ya están ocupados.",
            "author": "Oscar Wilde",
            "source": "ZenQuotes + DeepL",
            "date": Utc::now().date_naive().to_string(),
        })
    );

    let cache_control = response.headers.get("cache-control").unwrap();
    assert_eq!(
        cache_control.to_str().unwrap(),
        "public, s-maxage=86400, stale-while-revalidate"
    );
}

#[tokio::test]
async fn quote_is_served_from_cache_within_the_window() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .expect(1)
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(deepl_translation())
        .expect(1)
        .mount(&app.translation_server)
        .await;

    let first = app.get_quote().await;
    let second = app.get_quote().await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    assert_eq!(second.headers.get("x-cache").unwrap(), "HIT");
    assert!(second.headers.contains_key("cache-control"));
}

#[tokio::test]
async fn quote_cache_ignores_query_string() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .expect(1)
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(deepl_translation())
        .expect(1)
        .mount(&app.translation_server)
        .await;

    let first = app.get_quote().await;
    assert_eq!(first.status, StatusCode::OK);

    for n in 0..3 {
        let response = app
            .send(
                Request::get(format!("/api/quote?n={}", n))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers.get("x-cache").unwrap(), "HIT");
        assert_eq!(response.body, first.body);
    }
}

#[tokio::test]
async fn quote_returns_500_when_provider_has_no_quote() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .respond_with(deepl_translation())
        .expect(0)
        .mount(&app.translation_server)
        .await;

    for body in [json!([]), json!({"q": "not a list"}), json!([{"a": "Anonymous"}])] {
        app.quote_server.reset().await;
        Mock::given(method("GET"))
            .and(path("/api/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&app.quote_server)
            .await;

        let response = app.get_quote().await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "payload {}", body);
        assert_eq!(response.json(), json!({"error": "No quote found"}));
    }
}

#[tokio::test]
async fn quote_errors_are_not_cached() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&app.quote_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(deepl_translation())
        .mount(&app.translation_server)
        .await;

    let first = app.get_quote().await;
    let second = app.get_quote().await;

    assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.headers.get("x-cache").unwrap(), "MISS");
    assert_eq!(second.json()["author"], "Oscar Wilde");
}

#[tokio::test]
async fn quote_fails_without_translation_key() {
    let app = spawn_app_with(|config| config.quote.translation_api_key = None).await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(deepl_translation())
        .expect(0)
        .mount(&app.translation_server)
        .await;

    let response = app.get_quote().await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Error fetching daily quote"}));
}

#[tokio::test]
async fn quote_falls_back_to_original_on_unusable_translation() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translations": []})))
        .mount(&app.translation_server)
        .await;

    let response = app.get_quote().await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["translated"], body["original"]);
    assert_eq!(body["source"], "ZenQuotes + DeepL");
}

#[tokio::test]
async fn quote_returns_500_when_translation_times_out() {
    let app = spawn_app_with(|config| config.http_client.timeout_seconds = 1).await;
    Mock::given(method("GET"))
        .and(path("/api/random"))
        .respond_with(zen_quote())
        .mount(&app.quote_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(deepl_translation().set_delay(Duration::from_secs(3)))
        .mount(&app.translation_server)
        .await;

    let response = app.get_quote().await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Error fetching daily quote"}));
}

#[tokio::test]
async fn quote_returns_500_when_provider_is_unreachable() {
    let app = spawn_app_with(|config| {
        config.quote.quote_url = "http://127.0.0.1:9/api/random".to_string();
    })
    .await;

    let response = app.get_quote().await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Error fetching daily quote"}));
}
