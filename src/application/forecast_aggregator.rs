// Forecast aggregator - Per-metric projections and condition tallies
use crate::domain::weather::ForecastPoint;
use chrono::NaiveDateTime;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub time: NaiveDateTime,
    pub value: f64,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCount {
    pub condition: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastProjection {
    pub temperature: Vec<MetricPoint>,
    pub humidity: Vec<MetricPoint>,
    pub wind: Vec<MetricPoint>,
    pub condition_counts: Vec<ConditionCount>,
}

/// Split a city's forecast into chartable projections labelled with `city_label`.
///
/// Condition counts come back most frequent first, ties in order of first
/// appearance.
pub fn project(series: &[ForecastPoint], city_label: &str) -> ForecastProjection {
    let mut projection = ForecastProjection::default();
    let mut tally: HashMap<String, usize> = HashMap::new();

    for point in series {
        let metric = |value: f64| MetricPoint {
            time: point.time,
            value,
            city: city_label.to_string(),
        };
        projection.temperature.push(metric(point.temperature_c));
        projection.humidity.push(metric(f64::from(point.humidity_pct)));
        projection.wind.push(metric(point.wind_kmh));

        match tally.get(&point.condition) {
            Some(&idx) => projection.condition_counts[idx].count += 1,
            None => {
                tally.insert(point.condition.clone(), projection.condition_counts.len());
                projection.condition_counts.push(ConditionCount {
                    condition: point.condition.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-appearance order among ties
    projection
        .condition_counts
        .sort_by(|a, b| b.count.cmp(&a.count));

    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(hour: u32, temp: f64, humidity: u8, wind_mps: f64, condition: &str) -> ForecastPoint {
        let time = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        ForecastPoint::new(time, temp, humidity, wind_mps, condition)
    }

    #[test]
    fn test_project_splits_metrics() {
        let series = vec![
            point(0, 20.5, 60, 5.0, "clear sky"),
            point(3, 19.0, 65, 2.5, "light rain"),
        ];

        let projection = project(&series, "Patna");

        assert_eq!(projection.temperature.len(), 2);
        assert_eq!(projection.temperature[0].value, 20.5);
        assert_eq!(projection.humidity[1].value, 65.0);
        assert_eq!(projection.wind[0].value, 18.0);
        assert!(projection.wind.iter().all(|p| p.city == "Patna"));
        assert!(projection.temperature[0].time < projection.temperature[1].time);
    }

    #[test]
    fn test_project_tallies_conditions() {
        let series = vec![
            point(0, 20.0, 60, 1.0, "light rain"),
            point(3, 20.0, 60, 1.0, "clear sky"),
            point(6, 20.0, 60, 1.0, "clear sky"),
            point(9, 20.0, 60, 1.0, "overcast clouds"),
        ];

        let projection = project(&series, "Delhi");

        let counts: Vec<(&str, usize)> = projection
            .condition_counts
            .iter()
            .map(|c| (c.condition.as_str(), c.count))
            .collect();
        assert_eq!(
            counts,
            vec![("Clear sky", 2), ("Light rain", 1), ("Overcast clouds", 1)]
        );
    }

    #[test]
    fn test_project_empty_series() {
        let projection = project(&Vec::new(), "Nowhere");
        assert!(projection.temperature.is_empty());
        assert!(projection.humidity.is_empty());
        assert!(projection.wind.is_empty());
        assert!(projection.condition_counts.is_empty());
    }
}
