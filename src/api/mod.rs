// src/api/mod.rs — HTTP API over the dispatcher

pub mod auth;
pub mod handlers;
pub mod types;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::Dispatcher;
use crate::infra::config::ApiConfig;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub dispatcher: Arc<Dispatcher>,
    pub token: Option<String>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/select", post(handlers::select_persona))
        .route("/api/v1/analyze", post(handlers::analyze_task))
        .route("/api/v1/feedback", post(handlers::record_feedback))
        .route("/api/v1/analytics", get(handlers::get_analytics))
        .route("/api/v1/improvements", post(handlers::suggest_improvements))
        .route(
            "/api/v1/auto-generation",
            get(handlers::get_auto_generation).post(handlers::set_auto_generation),
        )
        .route("/api/v1/threshold", post(handlers::set_threshold))
        .route("/api/v1/personas", get(handlers::list_personas))
        .route("/api/v1/personas/generated", get(handlers::list_generated))
        .route("/api/v1/personas/{id}", get(handlers::get_persona))
        .route("/api/v1/tasks/complete", post(handlers::complete_task))
        .route("/api/v1/context", get(handlers::get_context))
        .route("/api/v1/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port (blocking).
pub async fn start_server(config: &ApiConfig, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let router = build_router(ApiState {
        dispatcher,
        token: config.token.clone(),
    });

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
