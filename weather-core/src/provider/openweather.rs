use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config,
    config::{DEFAULT_BASE_URL, DEFAULT_LANG, DEFAULT_UNITS},
    error::LookupError,
    model::{CurrentConditions, ForecastEntry, ForecastSet, LookupQuery},
};

use super::WeatherProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        }
    }

    /// Shown when the service fails without a message of its own.
    fn fallback_message(self, query: &LookupQuery) -> &'static str {
        match (self, query) {
            (Endpoint::Forecast, _) => "No forecast data found",
            (Endpoint::Current, LookupQuery::Place(_)) => "No weather data found for this city",
            (Endpoint::Current, LookupQuery::Coordinates(_)) => {
                "No weather data found for this location"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            lang: DEFAULT_LANG.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            units: config.units.clone(),
            lang: config.lang.clone(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Sends one GET and returns the raw body after checking the service's
    /// own status code.
    async fn fetch(&self, endpoint: Endpoint, query: &LookupQuery) -> Result<String, LookupError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path());

        let mut params = query.location_params();
        params.push(("units", self.units.clone()));
        params.push(("lang", self.lang.clone()));
        params.push(("appid", self.api_key.clone()));

        tracing::debug!(endpoint = endpoint.path(), %query, "sending OpenWeather request");

        let res = self.http.get(&url).query(&params).send().await.map_err(|e| {
            tracing::error!(endpoint = endpoint.path(), error = %e, "OpenWeather request failed");
            LookupError::Transport(format!(
                "Failed to send request to OpenWeather ({}): {e}",
                endpoint.path()
            ))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            LookupError::Transport(format!(
                "Failed to read OpenWeather {} response body: {e}",
                endpoint.path()
            ))
        })?;

        if !status.is_success() {
            tracing::error!(
                endpoint = endpoint.path(),
                %status,
                body = %truncate_body(&body),
                "OpenWeather returned an error response"
            );
        }

        check_status(endpoint, query, &body)?;
        Ok(body)
    }
}

/// Envelope shared by every OpenWeather answer, successful or not.
#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCode>,
    message: Option<serde_json::Value>,
}

/// `cod` is a number on `/weather` and a string on `/forecast`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_number(&self) -> Option<i64> {
        match self {
            OwCode::Number(n) => Some(*n),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn check_status(endpoint: Endpoint, query: &LookupQuery, body: &str) -> Result<(), LookupError> {
    let envelope: OwEnvelope = serde_json::from_str(body).map_err(|e| {
        LookupError::Service(format!(
            "Failed to parse OpenWeather {} response: {e}",
            endpoint.path()
        ))
    })?;

    let code = envelope.cod.as_ref().and_then(OwCode::as_number);
    if code == Some(200) {
        return Ok(());
    }

    // Successful forecasts carry a numeric `message`; only text is meaningful here.
    let message = envelope
        .message
        .as_ref()
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| endpoint.fallback_message(query).to_string());

    tracing::warn!(endpoint = endpoint.path(), code = ?code, %message, "OpenWeather reported failure");

    match code {
        Some(404) => Err(LookupError::NotFound(message)),
        _ => Err(LookupError::Service(message)),
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    timezone: Option<i32>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
    city: Option<OwCity>,
}

fn parse_current(body: &str) -> Result<CurrentConditions, LookupError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|e| {
        LookupError::Service(format!("Failed to parse OpenWeather current JSON: {e}"))
    })?;

    let (condition, icon) = first_weather(parsed.weather);

    Ok(CurrentConditions {
        location_name: parsed.name,
        temperature_c: parsed.main.temp,
        condition,
        icon,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.map(|w| w.speed),
        observed_at: parsed.dt.and_then(unix_to_utc),
        utc_offset_secs: parsed.timezone,
    })
}

fn parse_forecast(body: &str) -> Result<ForecastSet, LookupError> {
    let parsed: OwForecastResponse = serde_json::from_str(body).map_err(|e| {
        LookupError::Service(format!("Failed to parse OpenWeather forecast JSON: {e}"))
    })?;

    let entries = parsed
        .list
        .into_iter()
        .filter_map(|entry| {
            let time = unix_to_utc(entry.dt)?;
            let (condition, icon) = first_weather(entry.weather);
            Some(ForecastEntry {
                time,
                temp_min_c: entry.main.temp_min,
                temp_max_c: entry.main.temp_max,
                condition,
                icon,
                humidity_pct: entry.main.humidity,
                wind_speed_mps: entry.wind.map(|w| w.speed),
                precipitation_probability: entry.pop,
            })
        })
        .collect();

    Ok(ForecastSet::new(
        entries,
        parsed.city.and_then(|c| c.timezone),
    ))
}

fn first_weather(weather: Vec<OwWeather>) -> (String, Option<String>) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), None))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LookupQuery) -> Result<CurrentConditions, LookupError> {
        let body = self.fetch(Endpoint::Current, query).await?;
        parse_current(&body)
    }

    async fn forecast(&self, query: &LookupQuery) -> Result<ForecastSet, LookupError> {
        let body = self.fetch(Endpoint::Forecast, query).await?;
        parse_forecast(&body)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
