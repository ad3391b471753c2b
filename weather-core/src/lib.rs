//! Core library for the `weather` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind a `WeatherProvider` trait
//! - The lookup cycle (current conditions, then forecast) and its view state
//! - Geolocation, place suggestions and display formatting
//!
//! It is used by `weather-lookup-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod display;
pub mod error;
pub mod geolocation;
pub mod lookup;
pub mod model;
pub mod places;
pub mod provider;

pub use config::Config;
pub use error::LookupError;
pub use geolocation::{FixedGeolocator, Geolocator, IpGeolocator, geolocator_from_config};
pub use lookup::{LookupPhase, LookupView, WeatherLookup};
pub use model::{
    Coordinates, CurrentConditions, DISPLAY_LIMIT, ForecastEntry, ForecastSet, LookupQuery,
    LookupResult, WeatherReport,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
