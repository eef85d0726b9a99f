// OpenWeatherMap client implementation
use crate::application::weather_source::WeatherSource;
use crate::domain::weather::{local_time_from_unix, CitySnapshot, ForecastPoint, ForecastSeries};
use crate::infrastructure::config::OpenWeatherSettings;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current weather",
            Endpoint::Forecast => "forecast",
        }
    }

    /// The current-weather endpoint reports `cod` as a number, the forecast
    /// endpoint as a string.
    fn is_success(&self, cod: Option<&Value>) -> bool {
        match (self, cod) {
            (Endpoint::Current, Some(Value::Number(n))) => n.as_i64() == Some(200),
            (Endpoint::Forecast, Some(Value::String(s))) => s == "200",
            _ => false,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherClientError {
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} response could not be parsed: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} response carried status {code}: {message}")]
    Status {
        endpoint: Endpoint,
        code: String,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: Option<String>,
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: String,
    current_url: String,
    forecast_url: String,
}

impl OpenWeatherClient {
    pub fn new(settings: &OpenWeatherSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            current_url: settings.current_url.clone(),
            forecast_url: settings.forecast_url.clone(),
        })
    }

    /// Send one query and return the body once its embedded status code says success.
    async fn execute_query(&self, endpoint: Endpoint, city: &str) -> Result<Value, WeatherClientError> {
        let url = match endpoint {
            Endpoint::Current => &self.current_url,
            Endpoint::Forecast => &self.forecast_url,
        };

        tracing::debug!("Requesting {} for {:?}", endpoint, city);

        // The provider embeds its status in the body, so the HTTP status is not checked.
        let body = self
            .http
            .get(url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|source| WeatherClientError::Transport { endpoint, source })?
            .text()
            .await
            .map_err(|source| WeatherClientError::Transport { endpoint, source })?;

        let data: Value = serde_json::from_str(&body)
            .map_err(|source| WeatherClientError::Parse { endpoint, source })?;

        if !endpoint.is_success(data.get("cod")) {
            return Err(WeatherClientError::Status {
                endpoint,
                code: data.get("cod").map(Value::to_string).unwrap_or_else(|| "missing".to_string()),
                message: data
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        Ok(data)
    }

    pub async fn try_fetch_current(&self, city: &str) -> Result<CitySnapshot, WeatherClientError> {
        let data = self.execute_query(Endpoint::Current, city).await?;
        let parsed: OwCurrentResponse = serde_json::from_value(data).map_err(|source| {
            WeatherClientError::Parse {
                endpoint: Endpoint::Current,
                source,
            }
        })?;

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.as_str())
            .ok_or_else(|| WeatherClientError::Parse {
                endpoint: Endpoint::Current,
                source: serde::de::Error::custom("empty weather list"),
            })?;

        Ok(CitySnapshot::new(
            parsed.name.clone().unwrap_or_else(|| city.to_string()),
            parsed.main.temp,
            parsed.main.humidity,
            parsed.wind.speed,
            description,
            Local::now().naive_local(),
        ))
    }

    pub async fn try_fetch_forecast(&self, city: &str) -> Result<ForecastSeries, WeatherClientError> {
        let data = self.execute_query(Endpoint::Forecast, city).await?;
        let parsed: OwForecastResponse = serde_json::from_value(data).map_err(|source| {
            WeatherClientError::Parse {
                endpoint: Endpoint::Forecast,
                source,
            }
        })?;

        parsed
            .list
            .iter()
            .map(|entry| -> Result<ForecastPoint, WeatherClientError> {
                let malformed = |reason: &str| WeatherClientError::Parse {
                    endpoint: Endpoint::Forecast,
                    source: serde::de::Error::custom(format!("entry {}: {}", entry.dt, reason)),
                };
                let time = local_time_from_unix(entry.dt).ok_or_else(|| malformed("timestamp out of range"))?;
                let description = entry
                    .weather
                    .first()
                    .map(|w| w.description.as_str())
                    .ok_or_else(|| malformed("empty weather list"))?;

                Ok(ForecastPoint::new(
                    time,
                    entry.main.temp,
                    entry.main.humidity,
                    entry.wind.speed,
                    description,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, city: &str) -> Option<CitySnapshot> {
        match self.try_fetch_current(city).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("No current weather for {:?}: {}", city, e);
                None
            }
        }
    }

    async fn fetch_forecast(&self, city: &str) -> ForecastSeries {
        match self.try_fetch_forecast(city).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!("No forecast for {:?}: {}", city, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CURRENT_PATH: &str = "/data/2.5/weather";
    const FORECAST_PATH: &str = "/data/2.5/forecast";

    fn client_for(server_uri: &str, timeout_secs: u64) -> OpenWeatherClient {
        OpenWeatherClient::new(&OpenWeatherSettings {
            api_key: "TEST_KEY".to_string(),
            current_url: format!("{}{}", server_uri, CURRENT_PATH),
            forecast_url: format!("{}{}", server_uri, FORECAST_PATH),
            timeout_secs,
        })
        .unwrap()
    }

    fn current_body(name: &str) -> Value {
        json!({
            "cod": 200,
            "name": name,
            "main": { "temp": 31.4, "feels_like": 33.0, "humidity": 48 },
            "wind": { "speed": 5.0, "deg": 120 },
            "weather": [
                { "main": "Haze", "description": "haze" },
                { "main": "Rain", "description": "light rain" }
            ]
        })
    }

    fn forecast_entry(dt: i64, temp: f64, description: &str) -> Value {
        json!({
            "dt": dt,
            "main": { "temp": temp, "humidity": 70 },
            "wind": { "speed": 2.5 },
            "weather": [{ "description": description }]
        })
    }

    async fn mount(server: &MockServer, route: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_current_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .and(query_param("q", "delhi"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Delhi")))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 5);
        let snapshot = client.fetch_current("delhi").await.unwrap();

        assert_eq!(snapshot.city, "Delhi");
        assert_eq!(snapshot.temperature_c, 31.4);
        assert_eq!(snapshot.humidity_pct, 48);
        assert_eq!(snapshot.wind_kmh, 18.0);
        assert_eq!(snapshot.condition, "Haze");
    }

    #[tokio::test]
    async fn test_fetch_current_falls_back_to_query_name() {
        let server = MockServer::start().await;
        let mut body = current_body("ignored");
        body.as_object_mut().unwrap().remove("name");
        mount(&server, CURRENT_PATH, 200, body).await;

        let client = client_for(&server.uri(), 5);
        let snapshot = client.fetch_current("Patna").await.unwrap();

        assert_eq!(snapshot.city, "Patna");
    }

    #[tokio::test]
    async fn test_fetch_current_city_not_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            CURRENT_PATH,
            404,
            json!({ "cod": "404", "message": "city not found" }),
        )
        .await;

        let client = client_for(&server.uri(), 5);

        let err = client.try_fetch_current("Atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherClientError::Status { ref message, .. } if message == "city not found"));
        assert!(client.fetch_current("Atlantis").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_current_requires_numeric_status() {
        let server = MockServer::start().await;
        let mut body = current_body("Delhi");
        body["cod"] = json!("200");
        mount(&server, CURRENT_PATH, 200, body).await;

        let client = client_for(&server.uri(), 5);

        assert!(client.fetch_current("Delhi").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_current_malformed_bodies() {
        let server = MockServer::start().await;
        let mut body = current_body("Delhi");
        body["weather"] = json!([]);
        mount(&server, CURRENT_PATH, 200, body).await;

        let client = client_for(&server.uri(), 5);
        let err = client.try_fetch_current("Delhi").await.unwrap_err();
        assert!(matches!(err, WeatherClientError::Parse { .. }));

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 5);
        assert!(client.fetch_current("Delhi").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_current_transport_failure() {
        let client = client_for("http://127.0.0.1:1", 1);

        let err = client.try_fetch_current("Delhi").await.unwrap_err();
        assert!(matches!(err, WeatherClientError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_current_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body("Delhi"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 1);

        assert!(client.fetch_current("Delhi").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_forecast_success() {
        let server = MockServer::start().await;
        mount(
            &server,
            FORECAST_PATH,
            200,
            json!({
                "cod": "200",
                "cnt": 2,
                "list": [
                    forecast_entry(1_714_564_800, 29.5, "clear sky"),
                    forecast_entry(1_714_575_600, 27.0, "few clouds")
                ],
                "city": { "name": "Patna", "country": "IN" }
            }),
        )
        .await;

        let client = client_for(&server.uri(), 5);
        let series = client.fetch_forecast("Patna").await;

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].time, local_time_from_unix(1_714_564_800).unwrap());
        assert_eq!(series[0].temperature_c, 29.5);
        assert_eq!(series[0].humidity_pct, 70);
        assert_eq!(series[0].wind_kmh, 9.0);
        assert_eq!(series[1].condition, "Few clouds");
    }

    #[tokio::test]
    async fn test_fetch_forecast_requires_string_status() {
        let server = MockServer::start().await;
        mount(
            &server,
            FORECAST_PATH,
            200,
            json!({ "cod": 200, "list": [forecast_entry(1_714_564_800, 29.5, "clear sky")] }),
        )
        .await;

        let client = client_for(&server.uri(), 5);

        assert!(client.fetch_forecast("Patna").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_forecast_without_list_is_empty() {
        let server = MockServer::start().await;
        mount(&server, FORECAST_PATH, 200, json!({ "cod": "200" })).await;

        let client = client_for(&server.uri(), 5);

        let series = client.try_fetch_forecast("Patna").await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_forecast_malformed_entry_discards_series() {
        let server = MockServer::start().await;
        mount(
            &server,
            FORECAST_PATH,
            200,
            json!({
                "cod": "200",
                "list": [
                    forecast_entry(1_714_564_800, 29.5, "clear sky"),
                    { "dt": 1_714_575_600, "main": { "temp": 27.0, "humidity": 70 }, "wind": { "speed": 1.0 }, "weather": [] }
                ]
            }),
        )
        .await;

        let client = client_for(&server.uri(), 5);

        assert!(client.fetch_forecast("Patna").await.is_empty());
    }
}
