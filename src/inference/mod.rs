// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inference service relay
//!
//! Opaque client for the local Ollama-compatible inference server.
//! Requests are forwarded as-is and responses are relayed verbatim as
//! JSON values; this module never interprets model output.

pub mod client;
pub mod types;

pub use client::{InferenceError, OllamaClient};
pub use types::{ChatMessage, ChatRequest, EmbedRequest};
