// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Synchronous scrape endpoint tests
//!
//! These tests verify that:
//! - POST /scrape returns the cleaned text and favicon of the page
//! - An unparseable URL is rejected with 400
//! - An unreachable page surfaces as 502

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use fabstir_assist_node::api::http_server::{build_router, AppState};
use fabstir_assist_node::inference::OllamaClient;
use fabstir_assist_node::scrape::{ArticleFetcher, PageScraper, ScrapeConfig};
use fabstir_assist_node::search::{SearchAggregator, SearchProvider, SearxngClient};
use fabstir_assist_node::tasks::{TaskExecutor, TaskRegistry};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

fn fast_scrape_config() -> ScrapeConfig {
    ScrapeConfig {
        max_retries: 0,
        retry_delay_secs: 0.5,
        page_timeout_secs: 5,
        article_timeout_secs: 5,
        article_retry_delay_secs: 0.0,
        article_jitter_secs: 0.0,
        max_tokens: 1024,
    }
}

fn setup_state() -> AppState {
    let registry = Arc::new(TaskRegistry::new(3600, 1000));
    let gateway = Arc::new(OllamaClient::new("http://localhost:11434", 5));
    let scraper = Arc::new(PageScraper::new(fast_scrape_config()));
    let articles = Arc::new(ArticleFetcher::new(fast_scrape_config()));
    let provider: Arc<dyn SearchProvider> =
        Arc::new(SearxngClient::new("http://localhost:4000"));
    let aggregator = Arc::new(SearchAggregator::new(provider, articles));
    let executor = Arc::new(TaskExecutor::new(
        registry.clone(),
        gateway.clone(),
        scraper.clone(),
        aggregator.clone(),
    ));

    AppState {
        executor,
        registry,
        gateway,
        scraper,
        aggregator,
        search_model: "test-model".to_string(),
        public_base_url: "http://localhost:8000".to_string(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn scrape_request(url: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/scrape")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{ "url": "{}" }}"#, url)))
        .unwrap()
}

#[tokio::test]
async fn test_scrape_returns_cleaned_text_and_favicon() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html>
               <head><link rel="icon" href="/icon.svg"><script>skip();</script></head>
               <body><p>Visible content.</p></body>
               </html>"#,
        )
        .create_async()
        .await;

    let app = build_router(setup_state());
    let url = format!("{}/page", server.url());

    let response = app.oneshot(scrape_request(&url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["url"], url.as_str());
    assert!(json["cleaned_html"]
        .as_str()
        .unwrap()
        .contains("Visible content."));
    assert!(!json["cleaned_html"].as_str().unwrap().contains("skip"));
    assert_eq!(
        json["favicon"].as_str().unwrap(),
        format!("{}/icon.svg", server.url())
    );
}

#[tokio::test]
async fn test_invalid_url_is_rejected_with_400() {
    let app = build_router(setup_state());

    let response = app.oneshot(scrape_request("not a url")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_unreachable_page_surfaces_as_502() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;

    let app = build_router(setup_state());
    let url = format!("{}/gone", server.url());

    let response = app.oneshot(scrape_request(&url)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "upstream_error");
}
