//! HTTP API for the editor front-end

mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::playground::Playground;

pub use handlers::*;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub playground: Arc<Playground>,
}

impl AppState {
    pub fn new(playground: Playground) -> Self {
        Self {
            playground: Arc::new(playground),
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/languages", get(list_languages))
        .route("/api/estimate", post(estimate_complexity))
        .route("/api/run", post(run_code))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
