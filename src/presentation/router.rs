// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, index, settings, update_dashboard};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/api/settings", get(settings))
        .route("/api/dashboard", post(update_dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
