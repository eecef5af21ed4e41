// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search result aggregation and prompt composition

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::scrape::ArticleFetcher;

use super::searxng::SearchProvider;
use super::types::{AggregatedSearch, SearchError, SourceDocument};

/// Number of top search hits considered per aggregation
const MAX_SOURCES: usize = 3;

/// Aggregates web search results into a single citation-ready prompt
pub struct SearchAggregator {
    provider: Arc<dyn SearchProvider>,
    articles: Arc<ArticleFetcher>,
}

impl SearchAggregator {
    /// Create a new aggregator
    pub fn new(provider: Arc<dyn SearchProvider>, articles: Arc<ArticleFetcher>) -> Self {
        Self { provider, articles }
    }

    /// Search, fetch the top hits, and compose the prompt
    ///
    /// A provider failure aborts the aggregation. A per-URL fetch failure
    /// only drops that URL; survivors are renumbered sequentially from 1.
    /// Zero surviving sources is an error: the citation contract cannot
    /// be met with nothing to cite.
    pub async fn aggregate(&self, query: &str) -> Result<AggregatedSearch, SearchError> {
        let hits = self.provider.search(query).await?;
        info!(
            "Provider {} returned {} hits for query",
            self.provider.name(),
            hits.len()
        );

        let mut sources = Vec::new();
        for hit in hits.into_iter().take(MAX_SOURCES) {
            match self.articles.fetch_article(&hit.url).await {
                Ok(content) => {
                    sources.push(SourceDocument {
                        number: sources.len() + 1,
                        title: hit.title,
                        url: hit.url,
                        content,
                    });
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}, skipping source", hit.url, e);
                }
            }
        }

        if sources.is_empty() {
            return Err(SearchError::NoSources {
                query: query.to_string(),
            });
        }

        let searched_at = Utc::now();
        let prompt = compose_prompt(query, &sources, searched_at);
        info!("Aggregated {} sources for query", sources.len());

        Ok(AggregatedSearch {
            query: query.to_string(),
            prompt,
            sources,
            searched_at,
        })
    }
}

/// Compose the research-assistant prompt from the surviving sources
///
/// The timestamp grounds the instructions in the current date so the
/// model does not supplement the answer with stale knowledge.
pub fn compose_prompt(query: &str, sources: &[SourceDocument], now: DateTime<Utc>) -> String {
    let timestamp = now.format("%d/%m/%Y %H:%M:%S");
    let mut prompt = format!(
        "You are a web research assistant. Answer the following question based on the \
         provided sources denoted by <id[number]>. Always cite your sources with the \
         <id[number]> AND <url> used from the sources. If the question is answerable in \
         a short sentence, do that. If you have knowledge to supplement the answer, do \
         it, but don't do it if that knowledge is not current. Keep in mind that the \
         current date and time is {timestamp}.\n\nQuestion: {query}\n\nSources:\n"
    );

    for source in sources {
        prompt.push_str(&format!(
            "id:[{}.] - url:{}\ncontent:{}\n\n",
            source.number, source.url, source.content
        ));
    }

    prompt
}
