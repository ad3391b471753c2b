use std::fmt::Write;

use weather_lookup_core::{
    LookupView,
    display::{CurrentRow, ForecastRow, forecast_rows},
};

fn pct(value: Option<u8>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}%"))
}

fn speed(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v} m/s"))
}

fn current_block(out: &mut String, row: &CurrentRow) {
    let _ = writeln!(out, "{}", row.location_name);
    let _ = writeln!(out, "  🌡 Temperature: {}°C", row.temperature);
    let _ = writeln!(out, "  ☁️ Condition: {}", row.condition);
    let _ = writeln!(out, "  💧 Humidity: {}", pct(row.humidity_pct));
    let _ = writeln!(out, "  💨 Wind: {}", speed(row.wind_speed_mps));
}

fn forecast_line(out: &mut String, row: &ForecastRow) {
    let _ = writeln!(out, "  {}  {}", row.time_label, row.condition);
    let _ = writeln!(
        out,
        "    🌡 {}° / {}°  💧 {} | 💨 {}  🌧 Rain chance: {}%",
        row.temp_max,
        row.temp_min,
        pct(row.humidity_pct),
        speed(row.wind_speed_mps),
        row.precipitation_pct,
    );
}

/// Human-readable rendering of a lookup snapshot.
pub fn render_text(view: &LookupView, lang: &str) -> String {
    let mut out = String::new();

    if let Some(message) = view.error_message() {
        let _ = writeln!(out, "⚠ {message}");
    }

    if let Some(report) = view.report() {
        current_block(&mut out, &CurrentRow::new(&report.current));

        let rows = forecast_rows(&report.forecast, lang);
        if !rows.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Forecast");
            for row in &rows {
                forecast_line(&mut out, row);
            }
        }
    }

    out
}

pub fn render_json(view: &LookupView) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}
