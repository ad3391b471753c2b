//! The lookup cycle: validate, fetch current conditions, then the forecast,
//! and publish exactly one outcome.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    error::LookupError,
    geolocation::Geolocator,
    model::{LookupQuery, LookupResult, WeatherReport},
    provider::WeatherProvider,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPhase {
    #[default]
    Idle,
    InFlight,
}

/// What a renderer needs to draw the current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupView {
    pub phase: LookupPhase,
    /// Text the next place lookup starts from.
    pub query_text: String,
    pub result: Option<LookupResult>,
}

impl LookupView {
    pub fn report(&self) -> Option<&WeatherReport> {
        self.result.as_ref().and_then(LookupResult::report)
    }

    pub fn error_message(&self) -> Option<String> {
        self.result
            .as_ref()
            .and_then(LookupResult::error)
            .map(ToString::to_string)
    }
}

/// Runs lookups against a provider and keeps the latest outcome.
///
/// Operations take `&self`, so overlapping lookups are possible. Each one
/// takes a ticket when it starts; only the holder of the newest ticket may
/// publish its outcome.
#[derive(Debug)]
pub struct WeatherLookup {
    provider: Box<dyn WeatherProvider>,
    view: Mutex<LookupView>,
    latest: AtomicU64,
}

impl WeatherLookup {
    pub fn new(provider: impl WeatherProvider + 'static) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    pub fn from_boxed(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            view: Mutex::new(LookupView::default()),
            latest: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> LookupView {
        self.view.lock().clone()
    }

    pub fn query_text(&self) -> String {
        self.view.lock().query_text.clone()
    }

    pub fn set_query_text(&self, text: impl Into<String>) {
        self.view.lock().query_text = text.into();
    }

    pub async fn lookup(&self, query: LookupQuery) -> Result<WeatherReport, LookupError> {
        let ticket = self.begin();
        let outcome = self.fetch(&query).await;
        self.finish(ticket, &query, &outcome);
        outcome
    }

    pub async fn lookup_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherReport, LookupError> {
        self.lookup(LookupQuery::coordinates(lat, lon)).await
    }

    /// Blank names fail before any request is made.
    pub async fn lookup_by_name(&self, place_name: &str) -> Result<WeatherReport, LookupError> {
        match LookupQuery::place(place_name) {
            Ok(query) => self.lookup(query).await,
            Err(error) => self.reject(error),
        }
    }

    /// Locates the user once and looks up that position.
    pub async fn lookup_here(
        &self,
        geolocator: &dyn Geolocator,
    ) -> Result<WeatherReport, LookupError> {
        match geolocator.locate().await {
            Ok(here) => self.lookup(LookupQuery::Coordinates(here)).await,
            Err(error) => self.reject(error),
        }
    }

    async fn fetch(&self, query: &LookupQuery) -> Result<WeatherReport, LookupError> {
        let current = self.provider.current(query).await?;
        let forecast = self.provider.forecast(query).await?;
        Ok(WeatherReport { current, forecast })
    }

    /// Claims the newest ticket and clears whatever was shown before.
    fn begin(&self) -> u64 {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut view = self.view.lock();
        view.phase = LookupPhase::InFlight;
        view.result = None;
        ticket
    }

    fn finish(
        &self,
        ticket: u64,
        query: &LookupQuery,
        outcome: &Result<WeatherReport, LookupError>,
    ) {
        let mut view = self.view.lock();
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, %query, "discarding outcome of superseded lookup");
            return;
        }

        match outcome {
            Ok(report) => {
                tracing::info!(%query, location = %report.current.location_name, "lookup succeeded");
                if !report.current.location_name.is_empty() {
                    view.query_text = report.current.location_name.clone();
                }
            }
            Err(error) => {
                tracing::warn!(%query, kind = error.kind(), %error, "lookup failed");
            }
        }

        view.result = Some(LookupResult::from(outcome.clone()));
        view.phase = LookupPhase::Idle;
    }

    /// Records a failure that happened before any weather request.
    fn reject(&self, error: LookupError) -> Result<WeatherReport, LookupError> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut view = self.view.lock();
        if self.latest.load(Ordering::SeqCst) == ticket {
            tracing::warn!(kind = error.kind(), %error, "lookup rejected");
            view.result = Some(LookupResult::Failure {
                error: error.clone(),
            });
            view.phase = LookupPhase::Idle;
        }
        Err(error)
    }
}
