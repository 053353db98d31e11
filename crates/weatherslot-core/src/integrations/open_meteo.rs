//! Open-Meteo integration -- keyless hourly forecasts by city or coordinates.

use chrono::FixedOffset;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{CoreError, ForecastError};
use crate::forecast::{ForecastSeries, OpenMeteoResponse};
use crate::integrations::traits::ForecastProvider;
use crate::storage::{LocationConfig, MAX_FORECAST_DAYS};

const USER_AGENT: &str = concat!("weatherslot/", env!("CARGO_PKG_VERSION"));
const GEOCODING_BASE: &str = "https://geocoding-api.open-meteo.com";
const FORECAST_BASE: &str = "https://api.open-meteo.com";
const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation_probability,precipitation,weathercode,windspeed_10m";
const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum";

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

pub struct OpenMeteoClient {
    client: Client,
    geocoding_base: Url,
    forecast_base: Url,
    location: LocationConfig,
}

impl OpenMeteoClient {
    pub fn new(location: LocationConfig) -> Result<Self, CoreError> {
        Self::with_base_urls(location, GEOCODING_BASE, FORECAST_BASE)
    }

    /// Point the client at other hosts, e.g. a local mock server.
    pub fn with_base_urls(
        location: LocationConfig,
        geocoding_base: &str,
        forecast_base: &str,
    ) -> Result<Self, CoreError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            geocoding_base: Url::parse(geocoding_base)?,
            forecast_base: Url::parse(forecast_base)?,
            location,
        })
    }

    /// Resolve a city name to coordinates using the first search result.
    pub async fn geocode(&self, name: &str) -> Result<Place, CoreError> {
        let mut url = self.geocoding_base.join("v1/search")?;
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("count", "1")
            .append_pair("language", "en")
            .append_pair("format", "json");

        debug!(%url, "geocoding");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(provider_error(resp).await);
        }

        let body: GeocodingResponse = resp.json().await?;
        let place = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::LocationNotFound(name.to_string()))?;
        info!(
            name = %place.name,
            latitude = place.latitude,
            longitude = place.longitude,
            "location resolved"
        );
        Ok(place)
    }

    /// Forecast request URL. Always asks for Celsius and km/h.
    pub fn forecast_url(&self, latitude: f64, longitude: f64, days: u32) -> Result<Url, CoreError> {
        let mut url = self.forecast_base.join("v1/forecast")?;
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("hourly", HOURLY_FIELDS)
            .append_pair("daily", DAILY_FIELDS)
            .append_pair("timezone", "auto")
            .append_pair("forecast_days", &days.clamp(1, MAX_FORECAST_DAYS).to_string());
        Ok(url)
    }

    async fn coordinates(&self) -> Result<(f64, f64), CoreError> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => {
                let place = self.geocode(&self.location.name).await?;
                Ok((place.latitude, place.longitude))
            }
        }
    }
}

impl ForecastProvider for OpenMeteoClient {
    fn name(&self) -> &str {
        "open-meteo"
    }

    async fn fetch(&self, days: u32) -> Result<ForecastSeries, CoreError> {
        let (latitude, longitude) = self.coordinates().await?;
        let url = self.forecast_url(latitude, longitude, days)?;

        debug!(%url, "requesting forecast");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(provider_error(resp).await);
        }

        let body: OpenMeteoResponse = resp.json().await?;
        let utc = FixedOffset::east_opt(0).ok_or(ForecastError::Unavailable)?;
        let series = body.into_series(utc)?;
        info!(
            hourly = series.hourly().len(),
            daily = series.daily().len(),
            "forecast fetched"
        );
        Ok(series)
    }
}

async fn provider_error(resp: reqwest::Response) -> CoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    ForecastError::Provider { status, body }.into()
}
