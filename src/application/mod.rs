// Application layer - Use cases and the ports they depend on
pub mod dashboard_service;
pub mod forecast_aggregator;
pub mod weather_source;
