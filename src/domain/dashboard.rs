// Dashboard domain model
use super::chart::{ComparisonChart, PieChart, Theme};
use super::weather::CitySnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityOption {
    pub label: String,
    pub value: String,
}

impl CityOption {
    pub fn new(name: &str) -> Self {
        Self {
            label: name.to_string(),
            value: name.to_string(),
        }
    }
}

/// Selected cities plus the dropdown options they are picked from.
///
/// Both lists only ever grow through [`CitySelection::grow`]; city names and
/// option values stay unique ignoring case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitySelection {
    cities: Vec<String>,
    options: Vec<CityOption>,
}

impl CitySelection {
    pub fn new(cities: Vec<String>, options: Vec<CityOption>) -> Self {
        let mut selection = Self::default();
        for city in cities {
            if !selection.contains_city(&city) {
                selection.cities.push(city);
            }
        }
        for option in options {
            if !selection.contains_option(&option.value) {
                selection.options.push(option);
            }
        }
        selection
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn options(&self) -> &[CityOption] {
        &self.options
    }

    pub fn contains_city(&self, name: &str) -> bool {
        self.cities.iter().any(|c| same_city(c, name))
    }

    pub fn contains_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| same_city(&o.value, value))
    }

    /// Append a provider-validated city. Returns false when it was already selected.
    pub fn grow(&mut self, canonical: &str) -> bool {
        if self.contains_city(canonical) {
            return false;
        }
        self.cities.push(canonical.to_string());
        if !self.contains_option(canonical) {
            self.options.push(CityOption::new(canonical));
        }
        true
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<CityOption>) {
        (self.cities, self.options)
    }
}

fn same_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCard {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_kmh: f64,
    pub condition: String,
    pub updated: String,
}

impl From<&CitySnapshot> for CityCard {
    fn from(snapshot: &CitySnapshot) -> Self {
        Self {
            city: snapshot.city.clone(),
            temperature_c: snapshot.temperature_c,
            humidity_pct: snapshot.humidity_pct,
            wind_kmh: snapshot.wind_kmh,
            condition: snapshot.condition.clone(),
            updated: snapshot.updated_label(),
        }
    }
}

/// Everything one dashboard refresh depends on.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardInput {
    #[serde(default)]
    pub selected_cities: Vec<String>,
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub current_options: Vec<CityOption>,
}

/// Rendered dashboard. `next_options` and `next_cities` are `None` unless a city was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardUpdate {
    pub cards: Vec<CityCard>,
    pub temperature_chart: ComparisonChart,
    pub humidity_chart: ComparisonChart,
    pub wind_chart: ComparisonChart,
    pub pie_charts: Vec<PieChart>,
    pub next_options: Option<Vec<CityOption>>,
    pub next_cities: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(cities: &[&str]) -> CitySelection {
        CitySelection::new(
            cities.iter().map(|c| c.to_string()).collect(),
            cities.iter().map(|c| CityOption::new(c)).collect(),
        )
    }

    #[test]
    fn test_new_drops_case_duplicates() {
        let sel = CitySelection::new(
            vec!["Patna".to_string(), "patna".to_string(), "Delhi".to_string()],
            vec![CityOption::new("Patna"), CityOption::new("PATNA")],
        );
        assert_eq!(sel.cities(), ["Patna", "Delhi"]);
        assert_eq!(sel.options(), [CityOption::new("Patna")]);
    }

    #[test]
    fn test_grow_appends_city_and_option() {
        let mut sel = selection(&["Patna"]);
        assert!(sel.grow("Delhi"));
        assert_eq!(sel.cities(), ["Patna", "Delhi"]);
        assert_eq!(sel.options().last(), Some(&CityOption::new("Delhi")));
    }

    #[test]
    fn test_grow_ignores_case_variants() {
        let mut sel = selection(&["Patna"]);
        assert!(!sel.grow("PATNA"));
        assert_eq!(sel.cities().len(), 1);
        assert_eq!(sel.options().len(), 1);
    }

    #[test]
    fn test_grow_keeps_existing_option() {
        // City was removed from the dropdown selection but its option remains.
        let mut sel = CitySelection::new(vec![], vec![CityOption::new("Delhi")]);
        assert!(sel.grow("delhi"));
        assert_eq!(sel.cities(), ["delhi"]);
        assert_eq!(sel.options(), [CityOption::new("Delhi")]);
    }

    #[test]
    fn test_input_defaults_when_fields_missing() {
        let input: DashboardInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, DashboardInput::default());
        assert_eq!(input.theme, Theme::Light);
    }
}
