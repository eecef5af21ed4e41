// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Background task execution
//!
//! One detached execution unit per submitted task. Submission registers
//! the task and returns immediately; the unit transitions the task to
//! `running`, dispatches on its kind, and writes exactly one terminal
//! outcome back into the registry. Errors and even panics inside the
//! unit are converted to a `failed` result, so no failure escapes the
//! background work or leaves a task permanently `running`.

use anyhow::Context;
use futures::FutureExt;
use serde_json::{json, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::inference::{ChatMessage, ChatRequest, EmbedRequest, OllamaClient};
use crate::scrape::PageScraper;
use crate::search::SearchAggregator;

use super::registry::TaskRegistry;
use super::types::{RegistryError, TaskKind, TaskPayload, TaskStatus};

/// Enlarged context window for search-augmented chat
///
/// Shared with the synchronous search endpoint so both flows ask the
/// model with the same options.
pub const SEARCH_CONTEXT_WINDOW: u64 = 8192;

/// Schedules and runs submitted tasks
#[derive(Clone)]
pub struct TaskExecutor {
    registry: Arc<TaskRegistry>,
    gateway: Arc<OllamaClient>,
    scraper: Arc<PageScraper>,
    aggregator: Arc<SearchAggregator>,
}

impl TaskExecutor {
    /// Create a new executor
    pub fn new(
        registry: Arc<TaskRegistry>,
        gateway: Arc<OllamaClient>,
        scraper: Arc<PageScraper>,
        aggregator: Arc<SearchAggregator>,
    ) -> Self {
        Self {
            registry,
            gateway,
            scraper,
            aggregator,
        }
    }

    /// Register a task and schedule its background execution
    ///
    /// Returns the fresh task id immediately; never waits for execution
    /// to start or finish.
    pub fn submit(&self, kind: TaskKind, payload: TaskPayload) -> Result<Uuid, RegistryError> {
        let id = Uuid::new_v4();
        self.registry.create(id, kind.clone(), payload)?;

        let executor = self.clone();
        tokio::spawn(async move { executor.supervise(id).await });

        info!("Task {} submitted with kind {}", id, kind);
        Ok(id)
    }

    /// The registry this executor writes into
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    async fn supervise(self, id: Uuid) {
        let run = AssertUnwindSafe(self.execute(id)).catch_unwind().await;

        if let Err(panic) = run {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "task panicked".to_string());
            error!("Task {} panicked: {}", id, message);

            if let Err(e) =
                self.registry
                    .complete(id, TaskStatus::Failed, json!({ "error": message }))
            {
                error!("Failed to record panic outcome for task {}: {}", id, e);
            }
        }
    }

    async fn execute(&self, id: Uuid) {
        let task = match self.registry.get(id) {
            Ok(task) => task,
            Err(e) => {
                error!("Task {} vanished before execution: {}", id, e);
                return;
            }
        };

        if let Err(e) = self.registry.mark_running(id) {
            error!("Task {} could not start: {}", id, e);
            return;
        }
        debug!("Task {} started", id);

        let (status, result) = match self.dispatch(&task.kind, &task.payload).await {
            Ok(value) => (TaskStatus::Done, value),
            Err(e) => {
                error!("Task {} failed: {:#}", id, e);
                (TaskStatus::Failed, json!({ "error": format!("{:#}", e) }))
            }
        };

        if let Err(e) = self.registry.complete(id, status, result) {
            error!("Failed to record outcome for task {}: {}", id, e);
            return;
        }
        info!("Task {} finished as {}", id, status);
    }

    async fn dispatch(&self, kind: &TaskKind, payload: &TaskPayload) -> anyhow::Result<Value> {
        match kind {
            TaskKind::SummarizeUrl => self.run_summarize_url(payload).await,
            TaskKind::SearchWeb => self.run_search_web(payload).await,
            TaskKind::Embed => self.run_embed(payload).await,
            TaskKind::Unknown => {
                // Deliberate leniency: report, don't fail
                warn!("Unrecognized task kind, reporting soft result");
                Ok(json!({ "error": "Unknown task type" }))
            }
        }
    }

    async fn run_summarize_url(&self, payload: &TaskPayload) -> anyhow::Result<Value> {
        let url = payload
            .url
            .as_deref()
            .context("summarize_url task has no url")?;

        let page = self
            .scraper
            .fetch_page(url)
            .await
            .context("failed to scrape URL")?;

        let mut first = payload
            .messages
            .first()
            .cloned()
            .context("summarize_url task has no messages")?;
        first.content = format!("{}\n{}", first.content, page.cleaned_text);

        let request = ChatRequest {
            model: payload.model.clone(),
            messages: vec![first],
            stream: payload.stream,
            options: payload.options.clone(),
            images: payload.images.clone(),
        };

        Ok(self.gateway.chat(&request).await?)
    }

    async fn run_search_web(&self, payload: &TaskPayload) -> anyhow::Result<Value> {
        let query = payload
            .search_query
            .as_deref()
            .context("search_web task has no search query")?;

        let aggregated = self.aggregator.aggregate(query).await?;

        let request = ChatRequest {
            model: payload.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: aggregated.prompt,
            }],
            stream: payload.stream,
            options: Some(json!({ "num_ctx": SEARCH_CONTEXT_WINDOW })),
            images: None,
        };

        Ok(self.gateway.chat(&request).await?)
    }

    async fn run_embed(&self, payload: &TaskPayload) -> anyhow::Result<Value> {
        let input = payload.input.clone().context("embed task has no input")?;

        let request = EmbedRequest {
            model: payload.model.clone(),
            input,
            truncate: payload.truncate.unwrap_or(true),
        };

        Ok(self.gateway.embed(&request).await?)
    }
}
