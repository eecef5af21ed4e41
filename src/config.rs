// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process-wide configuration
//!
//! Collaborator base URLs are fixed at startup; there is no dynamic
//! reconfiguration.

use std::env;
use url::Url;

use crate::scrape::ScrapeConfig;

/// Top-level node configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Base URL advertised in task status links
    pub public_base_url: String,
    /// Inference server base URL
    pub ollama_url: String,
    /// SearXNG instance base URL
    pub searxng_url: String,
    /// Model used to answer the synchronous `/search` endpoint
    pub search_model: String,
    /// Bounded timeout for inference calls in seconds
    pub inference_timeout_secs: u64,
    /// How long terminal tasks stay pollable, in seconds
    pub task_retention_secs: u64,
    /// Soft cap on retained task records
    pub max_tasks: usize,
    /// Fetch-path settings
    pub scrape: ScrapeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            searxng_url: env::var("SEARXNG_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
            search_model: env::var("SEARCH_MODEL")
                .unwrap_or_else(|_| "gemma2:2b-instruct-q6_K".to_string()),
            inference_timeout_secs: env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            task_retention_secs: env::var("TASK_RETENTION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            max_tasks: env::var("MAX_TASKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            scrape: ScrapeConfig::from_env(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.ollama_url).map_err(|e| format!("invalid OLLAMA_URL: {}", e))?;
        Url::parse(&self.searxng_url).map_err(|e| format!("invalid SEARXNG_URL: {}", e))?;
        Url::parse(&self.public_base_url)
            .map_err(|e| format!("invalid PUBLIC_BASE_URL: {}", e))?;

        if self.inference_timeout_secs == 0 {
            return Err("inference_timeout_secs must be at least 1".to_string());
        }
        if self.max_tasks == 0 {
            return Err("max_tasks must be at least 1".to_string());
        }

        self.scrape.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            public_base_url: "http://localhost:8000".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            searxng_url: "http://localhost:4000".to_string(),
            search_model: "gemma2:2b-instruct-q6_K".to_string(),
            inference_timeout_secs: 120,
            task_retention_secs: 3600,
            max_tasks: 1000,
            scrape: ScrapeConfig::default(),
        }
    }
}
