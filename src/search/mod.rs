// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search and result aggregation
//!
//! One provider call, top-3 result pages fetched through the article
//! extraction path, composed into a single citation-ready prompt. The
//! aggregator never calls the inference service itself; both the
//! synchronous `/search` endpoint and the `search_web` task flow consume
//! its output.

pub mod aggregator;
pub mod searxng;
pub mod types;

pub use aggregator::SearchAggregator;
pub use searxng::{SearchProvider, SearxngClient};
pub use types::{AggregatedSearch, SearchError, SearchHit, SourceDocument};
