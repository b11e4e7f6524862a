//! HTTP API server for the Q&A backend.
//!
//! Provides the public request surface: submit a video for processing and
//! chat about an indexed video.

use crate::answer::ChatTurn;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::AskTubeError;
use crate::orchestrator::Orchestrator;
use crate::retrieval::RetrievedSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(health))
        .route("/process-video", post(process_video))
        .route("/chat", post(chat))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("asktube API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /");
    Output::kv("Process video", "POST /process-video");
    Output::kv("Chat", "POST /chat");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct VideoRequest {
    url: String,
}

#[derive(Serialize)]
struct VideoResponse {
    message: String,
    video_id: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    query: String,
    video_id: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    sources: Vec<RetrievedSource>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Map an error to a status code and a client-safe message. Upstream
/// failures get a generic message; details stay in the logs.
fn error_response(e: &AskTubeError) -> (StatusCode, Json<ErrorResponse>) {
    if e.is_user_error() {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    } else {
        error!("Request failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "An error occurred while processing the request.".to_string(),
            }),
        )
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "running", "service": "asktube" }))
}

async fn process_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VideoRequest>,
) -> impl IntoResponse {
    match state.orchestrator.process_video(&req.url, false).await {
        Ok(result) if result.skipped => Json(VideoResponse {
            message: "Video loaded from cache.".to_string(),
            video_id: result.video_id,
        })
        .into_response(),
        Ok(result) => Json(VideoResponse {
            message: format!(
                "Video processed and indexed successfully ({} chunks).",
                result.chunks_indexed
            ),
            video_id: result.video_id,
        })
        .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    if req.query.trim().is_empty() || req.video_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Query and video ID are required.".to_string(),
            }),
        )
            .into_response();
    }

    match state
        .orchestrator
        .ask(&req.query, &req.video_id, &req.history)
        .await
    {
        Ok((response, sources)) => Json(ChatResponse { response, sources }).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
