// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for the Ollama-compatible inference server

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::types::{ChatRequest, EmbedRequest};

/// Errors from the inference service relay
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Transport-level failure (connection refused, DNS, etc.)
    #[error("inference request failed: {0}")]
    Request(String),

    /// Upstream returned a non-success status
    #[error("inference service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Upstream error body
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("inference request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// Upstream body was not valid JSON
    #[error("invalid inference response: {0}")]
    InvalidResponse(String),
}

/// Client for the local inference server
///
/// All calls carry a bounded timeout so an unresponsive upstream cannot
/// stall a task forever.
pub struct OllamaClient {
    base_url: String,
    client: Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Inference server base URL (e.g. `http://localhost:11434`)
    /// * `timeout_secs` - Per-request timeout in seconds
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            client,
            timeout_secs,
        }
    }

    /// List the models known to the inference server
    pub async fn list_models(&self) -> Result<Value, InferenceError> {
        debug!("Listing models from {}", self.base_url);
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        self.relay_json(response).await
    }

    /// Generate a chat completion
    pub async fn chat(&self, request: &ChatRequest) -> Result<Value, InferenceError> {
        debug!("Forwarding chat request for model {}", request.model);
        self.relay_post("/api/chat", request).await
    }

    /// Generate embeddings
    pub async fn embed(&self, request: &EmbedRequest) -> Result<Value, InferenceError> {
        debug!("Forwarding embed request for model {}", request.model);
        self.relay_post("/api/embed", request).await
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn relay_post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, InferenceError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        self.relay_json(response).await
    }

    async fn relay_json(&self, response: reqwest::Response) -> Result<Value, InferenceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_timeout() {
            InferenceError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            InferenceError::Request(e.to_string())
        }
    }
}
