// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP surface of the node
//!
//! JSON endpoints for task submission and polling, synchronous scraping
//! and search-plus-answer, and direct relays to the inference server.

pub mod errors;
pub mod http_server;
pub mod types;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState};
pub use types::{
    ScrapeRequest, ScrapeResponse, SearchAnswerResponse, SearchRequest, SubmitTaskRequest,
    SubmitTaskResponse,
};
