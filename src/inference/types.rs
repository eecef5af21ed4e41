// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types for the inference service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Message role ("system", "user", "assistant")
    pub role: String,
    /// Message text
    pub content: String,
}

/// Request body for the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name known to the inference server
    pub model: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Whether the upstream should stream tokens
    #[serde(default)]
    pub stream: bool,
    /// Model options (e.g. num_ctx), passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Base64 images for multimodal models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Request body for the embedding endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Embedding model name
    pub model: String,
    /// Text or list of texts to embed
    pub input: Value,
    /// Truncate input to the model context window
    #[serde(default = "default_truncate")]
    pub truncate: bool,
}

fn default_truncate() -> bool {
    true
}
