//! Web page acquisition and cleaning
//!
//! Two independent fetch paths:
//! - `PageScraper` — full-page scrape (cleaned text plus favicon) used by
//!   `summarize_url` tasks and the synchronous `/scrape` endpoint.
//! - `ArticleFetcher` — boilerplate-stripped, token-truncated article
//!   extraction used by the search aggregator, with a short fetch timeout.

pub mod article;
pub mod config;
pub mod extractor;
pub mod pacing;
pub mod page;

pub use article::ArticleFetcher;
pub use config::ScrapeConfig;
pub use page::{FetchError, PageScraper, ScrapedPage};
