//! genui-relay - generative UI relay for remote agent pipelines
//!
//! Invokes a remote agent pipeline, reconciles its event stream into UI
//! placeholders, and streams those placeholders to clients.

mod api;
mod config;
mod conversation;
mod events;
mod reconciler;
mod remote;
mod runtime;
mod ui;

use api::{create_router, AppState};
use config::RelayConfig;
use remote::{LoggingSource, RemoteRunnableClient};
use runtime::{EventSource, TurnRuntime};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genui_relay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = RelayConfig::from_env()?;
    ui::validate_registry()?;

    let client = RemoteRunnableClient::new(&config.remote_url, config.request_timeout)?;
    tracing::info!(
        url = %client.stream_url(),
        model_node = %config.nodes.model_invocation,
        tool_node = %config.nodes.tool_execution,
        idle_timeout_secs = config.event_idle_timeout.map(|t| t.as_secs()),
        "Remote pipeline configured"
    );
    let target = client.stream_url().to_string();
    let source: Arc<dyn EventSource> = Arc::new(LoggingSource::new(Arc::new(client), target));

    let runtime =
        TurnRuntime::new(source, config.nodes.clone()).with_idle_timeout(config.event_idle_timeout);
    let state = AppState::new(runtime);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("genui-relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
