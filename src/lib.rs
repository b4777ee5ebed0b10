pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod swagger;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use config::Config;
use db::Database;
use services::events::EventBroadcaster;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Room for multipart boundaries and headers around an uploaded CSV
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub events: EventBroadcaster,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            events: EventBroadcaster::new(),
        }
    }
}

/// Health check endpoint for monitoring
pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, StatusCode> {
    match state.db.check_pool_health().await {
        Ok(true) => Ok(Json(serde_json::json!({"status": "ok"}))),
        _ => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

/// Every router mounted on one app, as served by the binary
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(
        state
            .config
            .max_csv_size_bytes()
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    );

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/documents", routes::documents::router())
        .nest("/api/dashboard", routes::dashboard::router().layer(upload_limit.clone()))
        .nest("/api/requests", routes::requests::router())
        .nest("/api/upload", routes::upload::router().layer(upload_limit))
        .nest("/api/events", routes::events::router())
        .nest("/admin", routes::admin_surveys::router())
        .merge(swagger::create_swagger_router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
