//! Turns lookup results into display-ready values.
//!
//! Nothing here touches the terminal; renderers only print these rows.

use chrono::{DateTime, FixedOffset, Locale, Offset, Utc};
use serde::Serialize;

use crate::model::{CurrentConditions, ForecastEntry, ForecastSet};

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

const FORECAST_TIME_FORMAT: &str = "%a %-d %b %H:%M";

/// Rounds to whole degrees, halves going up (`-2.5` becomes `-2`).
pub fn round_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

/// Precipitation chance as a whole percentage; absent or zero shows as 0.
pub fn precipitation_percent(probability: Option<f64>) -> u8 {
    match probability {
        Some(p) if p > 0.0 => (p.min(1.0) * 100.0).round() as u8,
        _ => 0,
    }
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

/// Locale used for day and month names.
pub fn locale_for(lang: &str) -> Locale {
    match lang.trim().to_lowercase().as_str() {
        "th" => Locale::th_TH,
        "en" => Locale::en_US,
        "de" => Locale::de_DE,
        "fr" => Locale::fr_FR,
        "ja" => Locale::ja_JP,
        _ => Locale::POSIX,
    }
}

/// Short weekday, day, short month and time, in the location's local time
/// when its offset is known.
pub fn format_forecast_time(time: DateTime<Utc>, utc_offset_secs: Option<i32>, lang: &str) -> String {
    let offset = utc_offset_secs
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());

    time.with_timezone(&offset)
        .format_localized(FORECAST_TIME_FORMAT, locale_for(lang))
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentRow {
    pub location_name: String,
    pub temperature: i64,
    pub condition: String,
    pub icon_url: Option<String>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
}

impl CurrentRow {
    pub fn new(current: &CurrentConditions) -> Self {
        Self {
            location_name: current.location_name.clone(),
            temperature: round_temperature(current.temperature_c),
            condition: current.condition.clone(),
            icon_url: current.icon.as_deref().map(icon_url),
            humidity_pct: current.humidity_pct,
            wind_speed_mps: current.wind_speed_mps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub time_label: String,
    pub condition: String,
    pub icon_url: Option<String>,
    pub temp_max: i64,
    pub temp_min: i64,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_pct: u8,
}

impl ForecastRow {
    pub fn new(entry: &ForecastEntry, utc_offset_secs: Option<i32>, lang: &str) -> Self {
        Self {
            time_label: format_forecast_time(entry.time, utc_offset_secs, lang),
            condition: entry.condition.clone(),
            icon_url: entry.icon.as_deref().map(icon_url),
            temp_max: round_temperature(entry.temp_max_c),
            temp_min: round_temperature(entry.temp_min_c),
            humidity_pct: entry.humidity_pct,
            wind_speed_mps: entry.wind_speed_mps,
            precipitation_pct: precipitation_percent(entry.precipitation_probability),
        }
    }
}

/// Rows for the displayed part of the forecast.
pub fn forecast_rows(forecast: &ForecastSet, lang: &str) -> Vec<ForecastRow> {
    forecast
        .displayed()
        .iter()
        .map(|entry| ForecastRow::new(entry, forecast.utc_offset_secs, lang))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DISPLAY_LIMIT;
    use chrono::TimeZone;

    fn entry(ts: i64, pop: Option<f64>) -> ForecastEntry {
        ForecastEntry {
            time: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
            temp_min_c: 24.4,
            temp_max_c: 31.5,
            condition: "scattered clouds".into(),
            icon: Some("03d".into()),
            humidity_pct: Some(70),
            wind_speed_mps: Some(2.6),
            precipitation_probability: pop,
        }
    }

    #[test]
    fn temperatures_round_half_up() {
        assert_eq!(round_temperature(30.0), 30);
        assert_eq!(round_temperature(29.5), 30);
        assert_eq!(round_temperature(29.49), 29);
        assert_eq!(round_temperature(-2.5), -2);
        assert_eq!(round_temperature(-2.51), -3);
    }

    #[test]
    fn missing_or_zero_pop_is_zero_percent() {
        assert_eq!(precipitation_percent(None), 0);
        assert_eq!(precipitation_percent(Some(0.0)), 0);
        assert_eq!(precipitation_percent(Some(0.644)), 64);
        assert_eq!(precipitation_percent(Some(1.0)), 100);
    }

    #[test]
    fn icon_url_points_at_2x_png() {
        assert_eq!(icon_url("10d"), "https://openweathermap.org/img/wn/10d@2x.png");
    }

    #[test]
    fn forecast_time_uses_location_offset() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_forecast_time(time, Some(7 * 3600), "en"), "Mon 1 Jan 19:00");
        assert_eq!(format_forecast_time(time, None, "en"), "Mon 1 Jan 12:00");
    }

    #[test]
    fn forecast_time_is_localized() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let thai = format_forecast_time(time, Some(7 * 3600), "th");
        assert!(thai.ends_with("19:00"), "{thai}");
        assert!(!thai.contains("Mon"), "{thai}");
    }

    #[test]
    fn rows_cover_only_displayed_entries() {
        let entries = (0..40).map(|i| entry(1_700_000_000 + i * 10_800, None)).collect();
        let set = ForecastSet::new(entries, Some(25200));

        let rows = forecast_rows(&set, "en");
        assert_eq!(rows.len(), DISPLAY_LIMIT);
        assert_eq!(rows[0].time_label, format_forecast_time(set.entries[0].time, Some(25200), "en"));
        assert_eq!(
            rows[DISPLAY_LIMIT - 1].time_label,
            format_forecast_time(set.entries[DISPLAY_LIMIT - 1].time, Some(25200), "en")
        );
    }

    #[test]
    fn forecast_row_formats_fields() {
        let row = ForecastRow::new(&entry(1_700_000_000, None), None, "en");
        assert_eq!(row.temp_max, 32);
        assert_eq!(row.temp_min, 24);
        assert_eq!(row.precipitation_pct, 0);
        assert_eq!(
            row.icon_url.as_deref(),
            Some("https://openweathermap.org/img/wn/03d@2x.png")
        );
    }

    #[test]
    fn current_row_rounds_temperature() {
        let current = CurrentConditions {
            location_name: "Bangkok".into(),
            temperature_c: 30.2,
            condition: "haze".into(),
            icon: None,
            humidity_pct: Some(55),
            wind_speed_mps: Some(3.1),
            observed_at: None,
            utc_offset_secs: None,
        };
        let row = CurrentRow::new(&current);
        assert_eq!(row.temperature, 30);
        assert_eq!(row.location_name, "Bangkok");
        assert!(row.icon_url.is_none());
    }
}
