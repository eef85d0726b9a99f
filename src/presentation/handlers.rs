// HTTP request handlers
use crate::domain::chart::Theme;
use crate::domain::dashboard::{CityOption, DashboardInput, DashboardUpdate};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub title: String,
    pub default_cities: Vec<String>,
    pub default_options: Vec<CityOption>,
    pub refresh_interval_ms: u64,
    pub default_theme: Theme,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard page
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(INDEX_HTML.replace("{{title}}", &escape_html(&state.dashboard_settings.title)))
}

/// Initial selection and timer settings for the page
pub async fn settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    let dashboard = &state.dashboard_settings;
    let default_cities: Vec<String> = dashboard
        .default_cities
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    Json(SettingsResponse {
        title: dashboard.title.clone(),
        default_options: default_cities.iter().map(|c| CityOption::new(c)).collect(),
        default_cities,
        refresh_interval_ms: dashboard.refresh_interval_secs.saturating_mul(1000),
        default_theme: Theme::default(),
    })
}

/// Recompute the dashboard for the page's current selection
pub async fn update_dashboard(
    State(state): State<Arc<AppState>>,
    Json(input): Json<DashboardInput>,
) -> Json<DashboardUpdate> {
    tracing::debug!(
        "Dashboard update for {} cities (search: {:?}, theme: {:?})",
        input.selected_cities.len(),
        input.search_text,
        input.theme
    );

    Json(state.dashboard_service.update(input).await)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
