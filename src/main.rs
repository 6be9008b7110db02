//! Neon Snake Server
//!
//! Runs the game core per browser connection and streams rendered frames
//! over WebSocket.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_embed::Embed;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neon_snake::config::ServerConfig;
use neon_snake::state::{AppState, SessionInfo};
use neon_snake::ws::ws_handler;
use neon_snake::GameError;

/// Embedded static files
#[derive(Embed)]
#[folder = "static/"]
struct Assets;

/// Serve embedded static files
async fn serve_static(path: &str) -> impl IntoResponse {
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [("content-type", mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Index page handler
async fn index_handler() -> impl IntoResponse {
    serve_static("index.html").await
}

/// Static file handler
async fn static_handler(
    axum::extract::Path(path): axum::extract::Path<String>,
) -> impl IntoResponse {
    serve_static(&path).await
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Live sessions
async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<Vec<SessionInfo>> {
    Json(
        state
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect(),
    )
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neon_snake=debug,tower_http=debug".into()),
        )
        .init();

    if let Err(e) = run().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), GameError> {
    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/ws/play", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/{*path}", get(static_handler))
        .layer(cors)
        .with_state(state);

    // Start the server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Neon Snake running on http://{}", addr);
    info!("   WebSocket endpoint: ws://localhost:{}/ws/play", config.port);
    info!(
        "   Grid {}x{}, cell {}px",
        config.game.tiles_x, config.game.tiles_y, config.game.cell_size
    );

    axum::serve(listener, app).await?;
    Ok(())
}
