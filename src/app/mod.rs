pub mod extract;
pub mod handlers;
pub mod response;
pub mod state;

use crate::config::ServerConfig;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

pub use response::ContactResponse;
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(state.static_dir.as_path());
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/send_email", post(handlers::send_email))
        .nest_service("/static", assets)
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(server: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
