use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Number of forecast entries exposed for display.
pub const DISPLAY_LIMIT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// What a lookup is keyed by. Exactly one form is active per lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupQuery {
    Coordinates(Coordinates),
    Place(String),
}

impl LookupQuery {
    pub fn coordinates(lat: f64, lon: f64) -> Self {
        LookupQuery::Coordinates(Coordinates { lat, lon })
    }

    /// Build a place query, rejecting empty or whitespace-only names.
    pub fn place(name: &str) -> Result<Self, LookupError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LookupError::Validation);
        }
        Ok(LookupQuery::Place(trimmed.to_string()))
    }

    /// Query-string pairs that select the location on the weather service.
    pub fn location_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LookupQuery::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
            LookupQuery::Place(name) => vec![("q", name.clone())],
        }
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupQuery::Coordinates(c) => write!(f, "{c}"),
            LookupQuery::Place(name) => f.write_str(name),
        }
    }
}

/// Point-in-time weather snapshot for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub condition: String,
    pub icon: Option<String>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
    /// Shift of the location's local time from UTC, in seconds.
    pub utc_offset_secs: Option<i32>,
}

/// One future time slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition: String,
    pub icon: Option<String>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    /// Probability of precipitation in `0.0..=1.0`; absent means none.
    pub precipitation_probability: Option<f64>,
}

/// Chronologically ordered forecast entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSet {
    pub entries: Vec<ForecastEntry>,
    pub utc_offset_secs: Option<i32>,
}

impl ForecastSet {
    pub fn new(mut entries: Vec<ForecastEntry>, utc_offset_secs: Option<i32>) -> Self {
        entries.sort_by_key(|e| e.time);
        Self {
            entries,
            utc_offset_secs,
        }
    }

    /// The leading entries shown to the user, in original order.
    pub fn displayed(&self) -> &[ForecastEntry] {
        let end = self.entries.len().min(DISPLAY_LIMIT);
        &self.entries[..end]
    }
}

/// Current conditions together with the forecast for the same location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: ForecastSet,
}

/// Outcome of one lookup. Never holds a mix of fresh and stale data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResult {
    Success(WeatherReport),
    Failure { error: LookupError },
}

impl LookupResult {
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            LookupResult::Success(report) => Some(report),
            LookupResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupResult::Success(_) => None,
            LookupResult::Failure { error } => Some(error),
        }
    }
}

impl From<Result<WeatherReport, LookupError>> for LookupResult {
    fn from(value: Result<WeatherReport, LookupError>) -> Self {
        match value {
            Ok(report) => LookupResult::Success(report),
            Err(error) => LookupResult::Failure { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(hour: u32) -> ForecastEntry {
        ForecastEntry {
            time: Utc.with_ymd_and_hms(2025, 3, 1, hour % 24, 0, 0).unwrap()
                + chrono::Duration::days(i64::from(hour / 24)),
            temp_min_c: 20.0,
            temp_max_c: 30.0,
            condition: "clear sky".into(),
            icon: Some("01d".into()),
            humidity_pct: Some(60),
            wind_speed_mps: Some(2.0),
            precipitation_probability: None,
        }
    }

    #[test]
    fn place_query_rejects_blank_names() {
        assert_eq!(LookupQuery::place(""), Err(LookupError::Validation));
        assert_eq!(LookupQuery::place("  \t\n"), Err(LookupError::Validation));
    }

    #[test]
    fn place_query_is_trimmed() {
        let q = LookupQuery::place("  Chiang Mai ").unwrap();
        assert_eq!(q, LookupQuery::Place("Chiang Mai".into()));
        assert_eq!(q.location_params(), vec![("q", "Chiang Mai".to_string())]);
    }

    #[test]
    fn coordinate_query_params() {
        let q = LookupQuery::coordinates(13.75, 100.5);
        assert_eq!(
            q.location_params(),
            vec![("lat", "13.75".to_string()), ("lon", "100.5".to_string())]
        );
    }

    #[test]
    fn displayed_keeps_first_twelve_in_order() {
        let entries: Vec<_> = (0..40).map(|i| entry(i * 3)).collect();
        let set = ForecastSet::new(entries.clone(), None);

        let shown = set.displayed();
        assert_eq!(shown.len(), DISPLAY_LIMIT);
        assert_eq!(shown, &entries[..DISPLAY_LIMIT]);
    }

    #[test]
    fn displayed_short_list_is_whole_list() {
        let set = ForecastSet::new(vec![entry(0), entry(3)], None);
        assert_eq!(set.displayed().len(), 2);
    }

    #[test]
    fn forecast_set_is_chronological() {
        let set = ForecastSet::new(vec![entry(6), entry(0), entry(3)], None);
        let hours: Vec<_> = set.entries.iter().map(|e| e.time).collect();
        let mut sorted = hours.clone();
        sorted.sort();
        assert_eq!(hours, sorted);
    }
}
