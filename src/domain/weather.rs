// Weather domain models
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::Serialize;

const MPS_TO_KMH: f64 = 3.6;

/// Current conditions for one city, as resolved by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_kmh: f64,
    pub condition: String,
    pub retrieved_at: NaiveDateTime,
}

impl CitySnapshot {
    pub fn new(
        city: String,
        temperature_c: f64,
        humidity_pct: u8,
        wind_mps: f64,
        description: &str,
        retrieved_at: NaiveDateTime,
    ) -> Self {
        Self {
            city,
            temperature_c,
            humidity_pct,
            wind_kmh: wind_mps_to_kmh(wind_mps),
            condition: capitalize(description),
            retrieved_at: truncate_to_minute(retrieved_at),
        }
    }

    /// Retrieval time as shown on the city card.
    pub fn updated_label(&self) -> String {
        self.retrieved_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// One 3-hour forecast step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_kmh: f64,
    pub condition: String,
}

impl ForecastPoint {
    pub fn new(
        time: NaiveDateTime,
        temperature_c: f64,
        humidity_pct: u8,
        wind_mps: f64,
        description: &str,
    ) -> Self {
        Self {
            time,
            temperature_c,
            humidity_pct,
            wind_kmh: wind_mps_to_kmh(wind_mps),
            condition: capitalize(description),
        }
    }
}

/// Forecast steps for one city in provider order.
pub type ForecastSeries = Vec<ForecastPoint>;

/// Convert provider m/s into km/h rounded to one decimal.
pub fn wind_mps_to_kmh(mps: f64) -> f64 {
    (mps * MPS_TO_KMH * 10.0).round() / 10.0
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Local wall-clock time for a unix timestamp.
pub fn local_time_from_unix(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts, 0).map(|utc| utc.with_timezone(&Local).naive_local())
}

fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
