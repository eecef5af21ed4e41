// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod inference;
pub mod scrape;
pub mod search;
pub mod tasks;

// Re-export main types
pub use api::{ApiError, AppState, ErrorResponse};
pub use config::AppConfig;
pub use inference::{ChatMessage, ChatRequest, EmbedRequest, InferenceError, OllamaClient};
pub use scrape::{ArticleFetcher, FetchError, PageScraper, ScrapeConfig, ScrapedPage};
pub use search::{
    AggregatedSearch, SearchAggregator, SearchError, SearchHit, SearchProvider, SearxngClient,
    SourceDocument,
};
pub use tasks::{RegistryError, TaskExecutor, TaskKind, TaskPayload, TaskRecord, TaskRegistry, TaskStatus};
