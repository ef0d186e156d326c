//! HTTP surface.
//!
//! Routes:
//! - `POST /` and `POST /v1/chat`: the chat handler
//! - `GET /health`: liveness and persistence status
//!
//! CORS is permissive (any origin, preflight included) and every request is
//! traced through `tower-http`.

mod error;
mod handlers;
mod state;
mod wire;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::handle_chat))
        .route("/v1/chat", post(handlers::handle_chat))
        .route("/health", get(handlers::handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the router until `shutdown` is cancelled.
///
/// In-flight requests (including open streams) are allowed to finish.
pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
