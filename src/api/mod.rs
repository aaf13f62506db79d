// src/api/mod.rs — HTTP surface consumed by the platform's tools

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::context::ContextEngine;
use crate::infra::config::ApiConfig;

/// Shared state for API handlers.
///
/// The engine sits behind one async mutex, which serializes all writes —
/// the single-writer-per-user model the engine assumes.
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<Mutex<ContextEngine>>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/context/track", post(handlers::track))
        .route("/api/v1/context/enrich", post(handlers::enrich))
        .route(
            "/api/v1/context/{user_id}/predictions",
            get(handlers::predictions),
        )
        .route(
            "/api/v1/context/{user_id}/insights",
            get(handlers::insights),
        )
        .route("/api/v1/context/{user_id}/profile", get(handlers::profile))
        .route("/api/v1/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port (blocking).
pub async fn start_server(config: &ApiConfig, state: ApiState) -> anyhow::Result<()> {
    let port = config.port;
    let addr = format!("127.0.0.1:{port}");

    let router = build_router(state);

    tracing::info!("Context API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
