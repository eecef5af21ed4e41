// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SearXNG metasearch provider

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::{SearchError, SearchHit};

const SEARCH_TIMEOUT_SECS: u64 = 10;

/// Trait for implementing search providers
///
/// The aggregator only depends on this seam, so tests can substitute a
/// scripted provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search and return ranked hits
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// SearXNG instance client
///
/// Issues general-category, English-language queries in JSON format.
pub struct SearxngClient {
    base_url: String,
    client: Client,
}

impl SearxngClient {
    /// Create a new client for a SearXNG instance
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { base_url, client }
    }

    /// Base URL of the configured instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchProvider for SearxngClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        debug!("Searching for: {}", query);

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("categories_general", "general"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: SearxngResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(data.results)
    }

    fn name(&self) -> &'static str {
        "searxng"
    }
}

#[derive(Debug, serde::Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}
