// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request and response bodies for the HTTP surface
//!
//! Wire field names (`type`, `searchQ`, `cleaned_html`, ...) follow the
//! voice-assistant client's existing contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::inference::ChatMessage;
use crate::search::SourceDocument;
use crate::tasks::{TaskKind, TaskPayload, TaskStatus};

/// Body of `POST /task`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTaskRequest {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub model: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "searchQ", skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
}

impl SubmitTaskRequest {
    /// Split into the task kind and its immutable payload
    pub fn into_parts(self) -> (TaskKind, TaskPayload) {
        let kind = self.kind;
        let payload = TaskPayload {
            model: self.model,
            messages: self.messages,
            stream: self.stream,
            url: self.url,
            search_query: self.search_query,
            options: self.options,
            images: self.images,
            input: self.input,
            truncate: self.truncate,
        };
        (kind, payload)
    }
}

/// Body returned by `POST /task`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTaskResponse {
    pub received: bool,
    pub status_url: String,
    pub task_id: Uuid,
    pub status: TaskStatus,
}

/// Body of `POST /scrape`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// Body returned by `POST /scrape`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub url: String,
    pub cleaned_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

/// Body of `POST /search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub search_query: String,
}

/// Body returned by `POST /search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAnswerResponse {
    pub question: String,
    pub sources: Vec<SourceDocument>,
    pub answer: String,
}
