// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::openweather_client::OpenWeatherClient;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("weather_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create weather client (infrastructure layer)
    let client = Arc::new(OpenWeatherClient::new(&app_config.openweather)?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(client);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        dashboard_settings: app_config.dashboard.clone(),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr = app_config.server.bind_addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        "Starting weather dashboard on {} (cities: {:?}, refresh every {}s)",
        addr,
        app_config.dashboard.default_cities,
        app_config.dashboard.refresh_interval_secs
    );

    axum::serve(listener, router).await?;

    Ok(())
}
