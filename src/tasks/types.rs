// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Task lifecycle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::inference::ChatMessage;

/// Task lifecycle state
///
/// Advances monotonically: `scheduled -> running -> {done, failed}`.
/// Terminal states are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Scheduled,
    Running,
    Done,
    Failed,
}

impl TaskStatus {
    /// Whether this status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Scheduled => write!(f, "scheduled"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Task variant
///
/// Unrecognized kinds deserialize to `Unknown` and are tolerated: the
/// executor reports them as a soft `done` result rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    SummarizeUrl,
    SearchWeb,
    Embed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::SummarizeUrl => write!(f, "summarize_url"),
            TaskKind::SearchWeb => write!(f, "search_web"),
            TaskKind::Embed => write!(f, "embed"),
            TaskKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Variant-specific task input, immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Model to run the task against
    pub model: String,
    /// Messages for chat-based kinds
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Whether the upstream should stream (relayed as-is)
    #[serde(default)]
    pub stream: bool,
    /// URL for `summarize_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Query for `search_web`
    #[serde(rename = "searchQ", skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Model options, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Base64 images for multimodal models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Embedding input for `embed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Embedding truncation flag for `embed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
}

/// A registered task and its current state
///
/// `result` is written exactly once, together with the terminal status,
/// so a reader never observes a non-empty result on a non-terminal task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Opaque unique identifier assigned at submission
    pub id: Uuid,
    /// Task variant
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Variant-specific input
    #[serde(rename = "data")]
    pub payload: TaskPayload,
    /// Current lifecycle state
    pub status: TaskStatus,
    /// Terminal output: the upstream response on `done`, an error
    /// description on `failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Completion time, present once terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Registry-level errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A task with this id already exists
    #[error("task {0} already exists")]
    Duplicate(Uuid),

    /// No task with this id
    #[error("task {0} not found")]
    NotFound(Uuid),
}
