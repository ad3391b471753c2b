use crate::{
    Config,
    error::LookupError,
    model::{CurrentConditions, ForecastSet, LookupQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A remote source of current conditions and forecasts.
///
/// Both calls share the same success/failure shape so the lookup flow can
/// treat them uniformly.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LookupQuery) -> Result<CurrentConditions, LookupError>;

    async fn forecast(&self, query: &LookupQuery) -> Result<ForecastSet, LookupError>;
}

/// Construct the OpenWeather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
