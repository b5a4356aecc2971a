use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatrelay::{
    config::{ServerConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH},
    state::AppState,
    ws,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatrelay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting chatrelay...");

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ServerConfig::load_or_default(&config_path);

    // One registry shared by every listener
    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let mut servers = Vec::new();
    for listener_config in &config.servers {
        let addr = listener_config.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .unwrap_or_else(|e| panic!("failed to bind {} ({}): {}", addr, listener_config.name, e));
        tracing::info!(
            "{} listening on ws://{}/ws",
            listener_config.name,
            listener
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or(addr)
        );
        let app = app.clone();
        servers.push(tokio::spawn(async move { axum::serve(listener, app).await }));
    }

    for server in servers {
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("listener failed: {}", e),
            Err(e) => tracing::error!("listener task panicked: {}", e),
        }
    }
}
