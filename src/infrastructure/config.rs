use anyhow::{bail, Context};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub openweather: OpenWeatherSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenWeatherSettings {
    #[serde(default)]
    pub api_key: String,
    pub current_url: String,
    pub forecast_url: String,
    pub timeout_secs: u64,
}

impl OpenWeatherSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub title: String,
    pub default_cities: Vec<String>,
    pub refresh_interval_secs: u64,
}

/// Load settings from defaults, `config/dashboard.*` and `WEATHER__*` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("WEATHER")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dashboard.default_cities")
                .try_parsing(true),
        );

    build_app_config(builder)
}

fn build_app_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<AppConfig> {
    let settings = builder
        .set_default("server.bind_addr", "0.0.0.0:8050")?
        .set_default("openweather.current_url", DEFAULT_CURRENT_URL)?
        .set_default("openweather.forecast_url", DEFAULT_FORECAST_URL)?
        .set_default("openweather.timeout_secs", 10_i64)?
        .set_default("dashboard.title", "Weather Dashboard")?
        .set_default("dashboard.default_cities", vec!["Patna", "Delhi"])?
        .set_default("dashboard.refresh_interval_secs", 15_i64 * 60)?
        .build()
        .context("Failed to read dashboard configuration")?;

    let config: AppConfig = settings
        .try_deserialize()
        .context("Invalid dashboard configuration")?;
    config.validate()?;

    Ok(config)
}

impl AppConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.openweather.api_key.trim().is_empty() {
            bail!("Missing OpenWeather API key: set WEATHER__OPENWEATHER__API_KEY or openweather.api_key");
        }
        if self.openweather.timeout_secs == 0 {
            bail!("openweather.timeout_secs must be greater than zero");
        }
        if self.dashboard.default_cities.iter().all(|c| c.trim().is_empty()) {
            bail!("dashboard.default_cities must name at least one city");
        }
        if self.dashboard.refresh_interval_secs == 0 {
            bail!("dashboard.refresh_interval_secs must be greater than zero");
        }
        Ok(())
    }
}
