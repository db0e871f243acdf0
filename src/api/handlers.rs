//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ErrorResponse, HealthResponse, InvokeResponse, ToolInfo, ToolsResponse};
use super::AppState;
use crate::conversation::ConversationRequest;
use crate::runtime::{RenderSink, SseEvent, StreamingSink};
use crate::ui::{component, ToolKind, UiSurface};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Agent turns
        .route("/agent", post(stream_agent))
        .route("/agent/invoke", post(invoke_agent))
        // Registry info
        .route("/api/tools", get(list_tools))
        // Liveness
        .route("/health", get(health))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Agent Turns
// ============================================================

/// Run a turn and stream placeholder updates as they happen
async fn stream_agent(
    State(state): State<AppState>,
    Json(request): Json<ConversationRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (tx, rx) = mpsc::unbounded_channel();
    let runtime = state.runtime.clone();

    tokio::spawn(async move {
        let mut sink = StreamingSink::new(tx);
        let cancel = CancellationToken::new();
        let watcher = sink.cancel_on_disconnect(cancel.clone());

        let result = runtime.run(&request, &mut sink, &cancel).await;
        watcher.abort();

        let event = match result {
            Ok(outcome) => SseEvent::TurnDone {
                outcome,
                placeholders: sink.snapshot(),
            },
            Err(e) => SseEvent::Error {
                message: e.to_string(),
            },
        };
        sink.send(event);
    });

    Ok(sse_stream(rx))
}

/// Run a turn to completion and return the final surface
async fn invoke_agent(
    State(state): State<AppState>,
    Json(request): Json<ConversationRequest>,
) -> Result<Json<InvokeResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut surface = UiSurface::new();
    let outcome = state
        .runtime
        .run(&request, &mut surface, &CancellationToken::new())
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;

    Ok(Json(InvokeResponse {
        outcome,
        placeholders: surface.into_placeholders(),
    }))
}

// ============================================================
// Registry Info
// ============================================================

async fn list_tools() -> Json<ToolsResponse> {
    let tools = ToolKind::ALL
        .into_iter()
        .map(|tool| {
            let views = component(tool);
            ToolInfo {
                tool,
                loading: (views.loading)(None).component,
                final_view: (views.final_view)(None).component,
            }
        })
        .collect();

    Json(ToolsResponse { tools })
}

// ============================================================
// Liveness
// ============================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_version() -> &'static str {
    concat!("genui-relay ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    BadGateway(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
