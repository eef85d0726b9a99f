// Dashboard service - Use case for rebuilding the dashboard on every trigger
use crate::application::forecast_aggregator::{project, MetricPoint};
use crate::application::weather_source::WeatherSource;
use crate::domain::chart::{ChartKind, ChartPoint, ChartSeries, ComparisonChart, PieChart, PieSlice, Theme};
use crate::domain::dashboard::{CityCard, CitySelection, DashboardInput, DashboardUpdate};
use crate::domain::weather::{CitySnapshot, ForecastSeries};
use futures::future::join_all;
use std::sync::Arc;

struct MetricChart {
    id: &'static str,
    title: &'static str,
    empty_title: &'static str,
    kind: ChartKind,
    y_label: &'static str,
}

const TEMPERATURE_CHART: MetricChart = MetricChart {
    id: "temperature",
    title: "🌡 Temperature Forecast Comparison",
    empty_title: "No Temperature Data",
    kind: ChartKind::Line,
    y_label: "Temperature (°C)",
};

const HUMIDITY_CHART: MetricChart = MetricChart {
    id: "humidity",
    title: "💧 Humidity Forecast Comparison",
    empty_title: "No Humidity Data",
    kind: ChartKind::GroupedBar,
    y_label: "Humidity (%)",
};

const WIND_CHART: MetricChart = MetricChart {
    id: "wind",
    title: "💨 Wind Speed Forecast Comparison",
    empty_title: "No Wind Data",
    kind: ChartKind::Line,
    y_label: "Wind Speed (km/h)",
};

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn WeatherSource>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    pub async fn update(&self, input: DashboardInput) -> DashboardUpdate {
        let DashboardInput {
            selected_cities,
            search_text,
            theme,
            current_options,
        } = input;

        let mut selection = CitySelection::new(selected_cities, current_options);
        let added = self.grow_selection(&mut selection, search_text.as_deref()).await;

        let reports = self.fetch_reports(selection.cities()).await;

        let mut cards = Vec::new();
        let mut temperature = Vec::new();
        let mut humidity = Vec::new();
        let mut wind = Vec::new();
        let mut pie_charts = Vec::new();

        for (city, snapshot, forecast) in reports {
            if let Some(snapshot) = &snapshot {
                cards.push(CityCard::from(snapshot));
            }

            if forecast.is_empty() {
                continue;
            }

            let label = snapshot.as_ref().map_or(city.as_str(), |s| s.city.as_str());
            let projection = project(&forecast, label);

            let slices = projection
                .condition_counts
                .into_iter()
                .map(|c| PieSlice {
                    label: c.condition,
                    count: c.count,
                })
                .collect();
            pie_charts.push(PieChart::new(
                format!("{} - Condition Distribution", label),
                theme,
                slices,
            ));

            temperature.extend(projection.temperature);
            humidity.extend(projection.humidity);
            wind.extend(projection.wind);
        }

        let (next_options, next_cities) = if added {
            let (cities, options) = selection.into_parts();
            (Some(options), Some(cities))
        } else {
            (None, None)
        };

        DashboardUpdate {
            cards,
            temperature_chart: comparison_chart(&TEMPERATURE_CHART, temperature, theme),
            humidity_chart: comparison_chart(&HUMIDITY_CHART, humidity, theme),
            wind_chart: comparison_chart(&WIND_CHART, wind, theme),
            pie_charts,
            next_options,
            next_cities,
        }
    }

    /// Resolve the search text with the provider and add it to the selection.
    async fn grow_selection(&self, selection: &mut CitySelection, search_text: Option<&str>) -> bool {
        let Some(candidate) = search_text.map(str::trim).filter(|s| !s.is_empty()) else {
            return false;
        };

        if selection.contains_city(candidate) {
            return false;
        }

        match self.source.fetch_current(candidate).await {
            Some(snapshot) => {
                let added = selection.grow(&snapshot.city);
                if added {
                    tracing::info!("Added city {} (searched as {:?})", snapshot.city, candidate);
                } else {
                    tracing::debug!("{:?} resolved to already selected {}", candidate, snapshot.city);
                }
                added
            }
            None => {
                tracing::debug!("Discarding unresolved search {:?}", candidate);
                false
            }
        }
    }

    /// Fetch current conditions and forecast for every city, in city order.
    async fn fetch_reports(&self, cities: &[String]) -> Vec<(String, Option<CitySnapshot>, ForecastSeries)> {
        let fetches = cities.iter().map(|city| async move {
            let (snapshot, forecast) = futures::join!(
                self.source.fetch_current(city),
                self.source.fetch_forecast(city)
            );
            if snapshot.is_none() && forecast.is_empty() {
                tracing::debug!("No data for {} this pass", city);
            }
            (city.clone(), snapshot, forecast)
        });

        join_all(fetches).await
    }
}

fn comparison_chart(metric: &MetricChart, points: Vec<MetricPoint>, theme: Theme) -> ComparisonChart {
    if points.is_empty() {
        return ComparisonChart::placeholder(metric.id, metric.empty_title, metric.kind, metric.y_label, theme);
    }

    ComparisonChart::new(metric.id, metric.title, metric.kind, metric.y_label, theme, group_by_city(points))
}

/// One series per city label, in order of first appearance.
fn group_by_city(points: Vec<MetricPoint>) -> Vec<ChartSeries> {
    let mut series: Vec<ChartSeries> = Vec::new();

    for point in points {
        let chart_point = ChartPoint::new(point.time, point.value);
        match series.iter_mut().find(|s| s.name == point.city) {
            Some(existing) => existing.points.push(chart_point),
            None => series.push(ChartSeries::new(point.city, vec![chart_point])),
        }
    }

    series
}
