// Router setup with all API routes and middleware
// Configures the axum Router with CORS, request tracing, and the endpoint
// handlers, and owns server startup.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::Result;
use crate::api::handlers;
use crate::api::state::AppState;
use crate::config::Config;

/// Create the axum Router with all routes and middleware.
#[inline]
pub fn create_router(state: AppState) -> Router {
    // The service sits behind an application that may call from anywhere,
    // so CORS is open
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/vectorize", post(handlers::vectorize))
        .route("/retrieve-similar", post(handlers::retrieve_similar))
        .route("/cluster-documents", post(handlers::cluster_documents))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address and serve until the
/// process is stopped.
#[inline]
pub async fn start_server(config: &Config, state: AppState) -> Result<()> {
    let addr = config.server.bind_addr();
    let router = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
