// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use fabstir_assist_node::api::{start_server, AppState};
use fabstir_assist_node::config::AppConfig;
use fabstir_assist_node::inference::OllamaClient;
use fabstir_assist_node::scrape::{ArticleFetcher, PageScraper};
use fabstir_assist_node::search::{SearchAggregator, SearchProvider, SearxngClient};
use fabstir_assist_node::tasks::{TaskExecutor, TaskRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Assist Node...\n");

    let config = AppConfig::from_env();
    config.validate()?;

    tracing::info!(
        ollama_url = %config.ollama_url,
        searxng_url = %config.searxng_url,
        "configuration loaded"
    );

    let gateway = Arc::new(OllamaClient::new(
        config.ollama_url.clone(),
        config.inference_timeout_secs,
    ));
    let scraper = Arc::new(PageScraper::new(config.scrape.clone()));
    let articles = Arc::new(ArticleFetcher::new(config.scrape.clone()));
    let provider: Arc<dyn SearchProvider> =
        Arc::new(SearxngClient::new(config.searxng_url.clone()));
    let aggregator = Arc::new(SearchAggregator::new(provider, articles));

    let registry = Arc::new(TaskRegistry::new(config.task_retention_secs, config.max_tasks));
    let executor = Arc::new(TaskExecutor::new(
        registry.clone(),
        gateway.clone(),
        scraper.clone(),
        aggregator.clone(),
    ));

    let state = AppState {
        executor,
        registry,
        gateway,
        scraper,
        aggregator,
        search_model: config.search_model.clone(),
        public_base_url: config.public_base_url.clone(),
    };

    start_server(state, &config.bind_addr).await
}
