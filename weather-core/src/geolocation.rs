//! Single-shot position lookup used for "weather where I am".

use std::{fmt::Debug, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{Config, config::DEFAULT_GEOLOCATION_URL, error::LookupError, model::Coordinates};

const USER_AGENT: &str = concat!("weather-lookup/", env!("CARGO_PKG_VERSION"));

/// Something that can tell where the user is, once.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LookupError>;
}

/// Always answers with the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, LookupError> {
        Ok(self.0)
    }
}

/// Approximates the position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for geolocation")?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(DEFAULT_GEOLOCATION_URL)
    }
}

fn unavailable(reason: impl std::fmt::Display) -> LookupError {
    LookupError::Transport(format!("Unable to determine your location automatically: {reason}"))
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, LookupError> {
        tracing::debug!(url = %self.url, "requesting IP geolocation");

        let res = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::error!(error = %e, "geolocation request failed");
            unavailable(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(%status, "geolocation returned an error response");
            return Err(unavailable(format!("status {status}")));
        }

        let body: IpApiResponse = res.json().await.map_err(unavailable)?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                tracing::info!(lat, lon, "located via IP");
                Ok(Coordinates { lat, lon })
            }
            _ => Err(unavailable(
                body.message.unwrap_or_else(|| "no position in response".to_string()),
            )),
        }
    }
}

/// A fixed position from config wins over IP geolocation.
pub fn geolocator_from_config(config: &Config) -> anyhow::Result<Box<dyn Geolocator>> {
    if let Some(location) = config.location {
        return Ok(Box::new(FixedGeolocator(location)));
    }

    let geolocator = IpGeolocator::with_timeout(
        config.geolocation_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    Ok(Box::new(geolocator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_geolocator_returns_its_position() {
        let here = Coordinates { lat: 7.88, lon: 98.39 };
        assert_eq!(FixedGeolocator(here).locate().await, Ok(here));
    }

    #[tokio::test]
    async fn config_location_selects_fixed_geolocator() {
        let mut cfg = Config::default();
        cfg.location = Some(Coordinates { lat: 1.0, lon: 2.0 });

        let geo = geolocator_from_config(&cfg).unwrap();
        assert_eq!(geo.locate().await, Ok(Coordinates { lat: 1.0, lon: 2.0 }));
    }

    #[test]
    fn unavailable_is_a_transport_error() {
        let err = unavailable("reserved range");
        assert_eq!(
            err,
            LookupError::Transport(
                "Unable to determine your location automatically: reserved range".into()
            )
        );
    }
}
