// Domain layer - Weather, chart and dashboard models
pub mod chart;
pub mod dashboard;
pub mod weather;
