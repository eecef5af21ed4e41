//! Configuration for page and article fetching

use std::env;

/// Settings shared by the page and article fetch paths
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Additional attempts after the first failure (default: 3)
    pub max_retries: u32,
    /// Upper bound of the randomized page-path backoff in seconds (default: 5)
    pub retry_delay_secs: f64,
    /// Request timeout for the page path in seconds (default: 10)
    pub page_timeout_secs: u64,
    /// Request timeout for the article path in seconds (default: 4)
    pub article_timeout_secs: u64,
    /// Fixed delay between article-path attempts in seconds (default: 2)
    pub article_retry_delay_secs: f64,
    /// Upper bound of the article-path jitter in seconds (default: 2)
    pub article_jitter_secs: f64,
    /// Maximum whitespace-delimited words kept from an article (default: 1024)
    pub max_tokens: usize,
}

impl ScrapeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            max_retries: env::var("SCRAPE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay_secs: env::var("SCRAPE_RETRY_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5.0),
            page_timeout_secs: env::var("SCRAPE_PAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            article_timeout_secs: env::var("SCRAPE_ARTICLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            article_retry_delay_secs: env::var("SCRAPE_ARTICLE_RETRY_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2.0),
            article_jitter_secs: env::var("SCRAPE_ARTICLE_JITTER_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2.0),
            max_tokens: env::var("SCRAPE_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.page_timeout_secs == 0 {
            return Err("page_timeout_secs must be at least 1".to_string());
        }
        if self.article_timeout_secs == 0 {
            return Err("article_timeout_secs must be at least 1".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be at least 1".to_string());
        }
        if self.retry_delay_secs < 0.0 || self.article_retry_delay_secs < 0.0 {
            return Err("retry delays must not be negative".to_string());
        }
        Ok(())
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_secs: 5.0,
            page_timeout_secs: 10,
            article_timeout_secs: 4,
            article_retry_delay_secs: 2.0,
            article_jitter_secs: 2.0,
            max_tokens: 1024,
        }
    }
}
