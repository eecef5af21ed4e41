// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Page scraping tests against a stubbed HTTP server
//!
//! These tests verify that:
//! - A successful fetch returns cleaned text and a resolved favicon
//! - Server errors are retried until the attempt budget is exhausted
//! - Client errors (4xx) fail immediately without retrying
//! - A success after transient failures still returns the page

use fabstir_assist_node::scrape::{FetchError, PageScraper, ScrapeConfig};
use std::io::Write;

fn fast_config() -> ScrapeConfig {
    ScrapeConfig {
        max_retries: 2,
        retry_delay_secs: 0.5,
        page_timeout_secs: 5,
        article_timeout_secs: 5,
        article_retry_delay_secs: 0.0,
        article_jitter_secs: 0.0,
        max_tokens: 1024,
    }
}

const PAGE: &str = r#"
    <html>
    <head>
        <link rel="icon" href="/static/icon.png">
        <script>var noise = 1;</script>
    </head>
    <body>
        <h1>Welcome</h1>
        <p>Body text here.</p>
    </body>
    </html>
"#;

#[tokio::test]
async fn test_successful_fetch_returns_cleaned_text_and_favicon() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(PAGE)
        .create_async()
        .await;

    let scraper = PageScraper::new(fast_config());
    let url = format!("{}/page", server.url());
    let page = scraper.fetch_page(&url).await.unwrap();

    assert_eq!(page.url, url);
    assert!(page.cleaned_text.contains("Welcome"));
    assert!(page.cleaned_text.contains("Body text here."));
    assert!(!page.cleaned_text.contains("noise"));
    assert_eq!(
        page.favicon,
        Some(format!("{}/static/icon.png", server.url()))
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_exhaust_the_attempt_budget() {
    let mut server = mockito::Server::new_async().await;
    // max_retries = 2, so one initial attempt plus two retries
    let mock = server
        .mock("GET", "/flaky")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let scraper = PageScraper::new(fast_config());
    let url = format!("{}/flaky", server.url());
    let error = scraper.fetch_page(&url).await.unwrap_err();

    match error {
        FetchError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_errors_fail_immediately() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let scraper = PageScraper::new(fast_config());
    let url = format!("{}/missing", server.url());
    let error = scraper.fetch_page(&url).await.unwrap_err();

    match error {
        FetchError::HttpStatus { status, .. } => assert_eq!(status, 404),
        other => panic!("expected HttpStatus, got {}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transient_failure_then_success() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let mut server = mockito::Server::new_async().await;
    // First response aborts mid-body, second delivers the page
    let calls = Arc::new(AtomicUsize::new(0));
    let mock = server
        .mock("GET", "/recovering")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_chunked_body(move |w| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "reset"))
            } else {
                w.write_all(PAGE.as_bytes())
            }
        })
        .expect(2)
        .create_async()
        .await;

    let scraper = PageScraper::new(fast_config());
    let url = format!("{}/recovering", server.url());
    let page = scraper.fetch_page(&url).await.unwrap();

    assert!(page.cleaned_text.contains("Welcome"));
    mock.assert_async().await;
}
