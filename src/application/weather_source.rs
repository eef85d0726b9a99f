// Source trait for weather data access
use crate::domain::weather::{CitySnapshot, ForecastSeries};
use async_trait::async_trait;

/// Implementations absorb every provider failure: a missing snapshot or an
/// empty series is the only failure signal callers ever see.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions, or `None` when the city cannot be resolved
    async fn fetch_current(&self, city: &str) -> Option<CitySnapshot>;

    /// 5-day / 3-hour forecast, empty on any failure
    async fn fetch_forecast(&self, city: &str) -> ForecastSeries;
}
