// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::inference::{ChatMessage, ChatRequest, EmbedRequest, OllamaClient};
use crate::scrape::PageScraper;
use crate::search::SearchAggregator;
use crate::tasks::{TaskExecutor, TaskRecord, TaskRegistry, TaskStatus, SEARCH_CONTEXT_WINDOW};

use super::errors::ApiError;
use super::types::{
    ScrapeRequest, ScrapeResponse, SearchAnswerResponse, SearchRequest, SubmitTaskRequest,
    SubmitTaskResponse,
};

/// Shared handler state, constructed once at startup
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<TaskExecutor>,
    pub registry: Arc<TaskRegistry>,
    pub gateway: Arc<OllamaClient>,
    pub scraper: Arc<PageScraper>,
    pub aggregator: Arc<SearchAggregator>,
    /// Model used to answer the synchronous `/search` endpoint
    pub search_model: String,
    /// Base URL advertised in task status links
    pub public_base_url: String,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        // Inference relays
        .route("/api/tags", get(models_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/embed", post(embed_handler))
        // Asynchronous task interface
        .route("/task", post(submit_task_handler))
        .route("/task/status/:task_id", get(task_status_handler))
        // Synchronous content endpoints
        .route("/scrape", post(scrape_handler))
        .route("/search", post(search_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = bind_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    Json(json!({ "message": "Assist node is running" }))
}

async fn models_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiErrorResponse> {
    state
        .gateway
        .list_models()
        .await
        .map(Json)
        .map_err(|e| ApiErrorResponse(e.into()))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ApiErrorResponse> {
    state
        .gateway
        .chat(&request)
        .await
        .map(Json)
        .map_err(|e| ApiErrorResponse(e.into()))
}

async fn embed_handler(
    State(state): State<AppState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<Value>, ApiErrorResponse> {
    state
        .gateway
        .embed(&request)
        .await
        .map(Json)
        .map_err(|e| ApiErrorResponse(e.into()))
}

async fn submit_task_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitTaskRequest>,
) -> Result<Json<SubmitTaskResponse>, ApiErrorResponse> {
    let (kind, payload) = request.into_parts();

    let task_id = state
        .executor
        .submit(kind, payload)
        .map_err(|e| ApiErrorResponse(e.into()))?;

    Ok(Json(SubmitTaskResponse {
        received: true,
        status_url: format!(
            "{}/task/status/{}",
            state.public_base_url.trim_end_matches('/'),
            task_id
        ),
        task_id,
        status: TaskStatus::Scheduled,
    }))
}

async fn task_status_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskRecord>, ApiErrorResponse> {
    // An unparseable id cannot name a task; report it the same way
    let id = Uuid::parse_str(&task_id).map_err(|_| {
        ApiErrorResponse(ApiError::NotFound(format!("task {} not found", task_id)))
    })?;

    state
        .registry
        .get(id)
        .map(Json)
        .map_err(|e| ApiErrorResponse(e.into()))
}

async fn scrape_handler(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiErrorResponse> {
    let page = state
        .scraper
        .fetch_page(&request.url)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    Ok(Json(ScrapeResponse {
        url: page.url,
        cleaned_html: page.cleaned_text,
        favicon: page.favicon,
    }))
}

async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchAnswerResponse>, ApiErrorResponse> {
    let aggregated = state
        .aggregator
        .aggregate(&request.search_query)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    let chat = ChatRequest {
        model: state.search_model.clone(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: aggregated.prompt,
        }],
        stream: false,
        options: Some(json!({ "num_ctx": SEARCH_CONTEXT_WINDOW })),
        images: None,
    };

    let response = state
        .gateway
        .chat(&chat)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    let answer = extract_answer(&response);

    Ok(Json(SearchAnswerResponse {
        question: aggregated.query,
        sources: aggregated.sources,
        answer,
    }))
}

/// Pull the answer text out of the relayed inference response
///
/// Accepts both the flat `response` field and the chat-style
/// `message.content` shape.
fn extract_answer(response: &Value) -> String {
    response
        .get("response")
        .and_then(Value::as_str)
        .or_else(|| response.pointer("/message/content").and_then(Value::as_str))
        .unwrap_or("No answer generated.")
        .to_string()
}

// Error response wrapper
pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.0.to_response();

        (status, Json(error_response)).into_response()
    }
}
