//! Article extraction path used by the search aggregator
//!
//! Unlike the full-page path, this applies a short fetch timeout,
//! extracts only the main article content, and truncates the result to
//! a word budget. A timeout abandons the URL immediately instead of
//! consuming the remaining retry budget.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::config::ScrapeConfig;
use super::extractor::extract_article;
use super::pacing::{random_user_agent, uniform_delay};
use super::page::FetchError;

/// Fetcher for token-truncated article content
pub struct ArticleFetcher {
    client: Client,
    config: ScrapeConfig,
}

impl ArticleFetcher {
    /// Create a new article fetcher
    pub fn new(config: ScrapeConfig) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch a URL and extract its main article content
    ///
    /// Retries non-timeout failures up to `max_retries` attempts with a
    /// fixed delay plus uniform `[0, jitter]`-second jitter between
    /// attempts. An empty extraction is a failure distinct from a
    /// network error but is retried the same way.
    pub async fn fetch_article(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = String::new();
        let attempts = self.config.max_retries.max(1);

        for attempt in 0..attempts {
            if attempt > 0 {
                let base = Duration::from_secs_f64(self.config.article_retry_delay_secs);
                let jitter = uniform_delay(
                    &mut rand::thread_rng(),
                    0.0,
                    self.config.article_jitter_secs,
                );
                debug!(
                    "Retrying article fetch for {} in {:.2}s",
                    url,
                    (base + jitter).as_secs_f64()
                );
                tokio::time::sleep(base + jitter).await;
            }

            match self.try_fetch(url).await {
                Ok(content) => {
                    debug!("Extracted {} chars of article from {}", content.len(), url);
                    return Ok(content);
                }
                Err(e @ FetchError::Timeout(_)) => {
                    // Timeouts are not retried
                    warn!("Timeout fetching {}, abandoning URL", url);
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "Article fetch attempt {} for {} failed: {}",
                        attempt + 1,
                        url,
                        e
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts,
            last_error,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = random_user_agent(&mut rand::thread_rng());

        let response = self
            .client
            .get(url)
            .header("User-Agent", user_agent)
            .timeout(Duration::from_secs(self.config.article_timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        extract_article(&html, self.config.max_tokens)
            .ok_or_else(|| FetchError::EmptyExtraction(url.to_string()))
    }

    /// Get the configuration
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }
}
