//! Full-page scraping with retry and backoff
//!
//! Fetches a single URL, strips non-content markup, and resolves the
//! page's icon reference.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::config::ScrapeConfig;
use super::extractor::{clean_page_text, find_favicon};
use super::pacing::{random_user_agent, uniform_delay};

/// Normalized output of fetching and cleaning a single URL
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    /// The URL that was fetched
    pub url: String,
    /// Visible text with script/style noise removed, newline-joined
    pub cleaned_text: String,
    /// Discovered icon reference, if the URL was parseable
    pub favicon: Option<String>,
}

/// Errors from page and article fetching
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Request exceeded its timeout
    #[error("timeout fetching {0}")]
    Timeout(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-retryable HTTP status (4xx)
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// The URL that returned it
        url: String,
    },

    /// Page fetched but nothing meaningful could be extracted
    #[error("no content extracted from {0}")]
    EmptyExtraction(String),

    /// All attempts failed
    #[error("failed to fetch {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// The URL that kept failing
        url: String,
        /// Total attempts made
        attempts: u32,
        /// The last error observed
        last_error: String,
    },
}

/// Scraper for the full-page path
pub struct PageScraper {
    client: Client,
    config: ScrapeConfig,
}

impl PageScraper {
    /// Create a new page scraper
    pub fn new(config: ScrapeConfig) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch a page and return its cleaned text and favicon
    ///
    /// Transient failures (network errors, 5xx) are retried up to
    /// `max_retries` additional times with a randomized backoff in
    /// `[0.5, retry_delay]` seconds. 4xx statuses fail immediately.
    pub async fn fetch_page(&self, url: &str) -> Result<ScrapedPage, FetchError> {
        Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay =
                    uniform_delay(&mut rand::thread_rng(), 0.5, self.config.retry_delay_secs);
                debug!(
                    "Retrying {} in {:.2}s (attempt {}/{})",
                    url,
                    delay.as_secs_f64(),
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(delay).await;
            }

            match self.try_fetch(url).await {
                Ok(page) => {
                    info!("Scraped {} chars from {}", page.cleaned_text.len(), url);
                    return Ok(page);
                }
                Err(e @ FetchError::HttpStatus { status, .. }) if status < 500 => {
                    // 4xx is not retried
                    return Err(e);
                }
                Err(e) => {
                    warn!("Fetch attempt {} for {} failed: {}", attempt + 1, url, e);
                    last_error = e.to_string();
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<ScrapedPage, FetchError> {
        let user_agent = random_user_agent(&mut rand::thread_rng());

        let response = self
            .client
            .get(url)
            .header("User-Agent", user_agent)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .timeout(Duration::from_secs(self.config.page_timeout_secs))
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

        let cleaned_text = clean_page_text(&html);
        let favicon = find_favicon(&html, url);

        Ok(ScrapedPage {
            url: url.to_string(),
            cleaned_text,
            favicon,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }
}
