// Chart domain models
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Layout colors the browser page applies to every chart.
    pub fn style(&self) -> ChartStyle {
        match self {
            Theme::Light => ChartStyle {
                background: "#ffffff",
                foreground: "#2a3f5f",
                grid: "#e5ecf6",
            },
            Theme::Dark => ChartStyle {
                background: "#111111",
                foreground: "#f2f5fa",
                grid: "#283442",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartStyle {
    pub background: &'static str,
    pub foreground: &'static str,
    pub grid: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(time: NaiveDateTime, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn new(name: String, points: Vec<ChartPoint>) -> Self {
        Self { name, points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    GroupedBar,
}

/// Cross-city chart for one metric, one series per city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub theme: Theme,
    pub style: ChartStyle,
    pub series: Vec<ChartSeries>,
}

impl ComparisonChart {
    pub fn new(
        id: &str,
        title: &str,
        kind: ChartKind,
        y_label: &str,
        theme: Theme,
        series: Vec<ChartSeries>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            x_label: "Date".to_string(),
            y_label: y_label.to_string(),
            theme,
            style: theme.style(),
            series,
        }
    }

    /// Chart shown in place of a metric nobody reported data for.
    pub fn placeholder(id: &str, title: &str, kind: ChartKind, y_label: &str, theme: Theme) -> Self {
        Self::new(id, title, kind, y_label, theme, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub theme: Theme,
    pub style: ChartStyle,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn new(title: String, theme: Theme, slices: Vec<PieSlice>) -> Self {
        Self {
            title,
            theme,
            style: theme.style(),
            slices,
        }
    }
}
