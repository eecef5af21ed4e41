// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for web search aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single hit returned by the search provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    #[serde(default)]
    pub title: String,
    /// Result URL
    pub url: String,
}

/// A fetched source cited in the composed prompt
///
/// `number` is the 1-based position among the sources that were actually
/// fetched successfully; dropped URLs do not reserve a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceDocument {
    /// Sequential citation id, starting at 1
    pub number: usize,
    /// Title from the search provider
    pub title: String,
    /// Source URL
    pub url: String,
    /// Token-truncated article content
    pub content: String,
}

/// Output of a search-and-aggregate run
#[derive(Debug, Clone)]
pub struct AggregatedSearch {
    /// The original query
    pub query: String,
    /// The composed, citation-ready prompt
    pub prompt: String,
    /// Sources cited in the prompt, in citation order
    pub sources: Vec<SourceDocument>,
    /// When the aggregation ran (embedded in the prompt for temporal grounding)
    pub searched_at: DateTime<Utc>,
}

/// Errors from search operations
///
/// Per-page fetch failures are not represented here: they are logged and
/// the page is dropped. Only provider-level failures (or zero surviving
/// sources) abort an aggregation.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search provider returned a non-success status
    #[error("search provider returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider error body
        message: String,
    },

    /// Transport-level failure talking to the provider
    #[error("search request failed: {0}")]
    Request(String),

    /// Provider body was not the expected JSON shape
    #[error("invalid search response: {0}")]
    InvalidResponse(String),

    /// Every candidate page failed to fetch
    #[error("no sources could be fetched for query: {query}")]
    NoSources {
        /// The query that produced no usable sources
        query: String,
    },
}
