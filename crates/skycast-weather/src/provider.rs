//! OpenWeatherMap 2.5 client: current conditions, air pollution, forecast.

use std::sync::Arc;

use skycast_core::{HttpFetch, HttpRequest, WeatherConfig};
use tracing::instrument;
use url::Url;

use crate::types::{
    AirPollutionResponse, Coordinates, CurrentResponse, ForecastEntry, ForecastResponse,
    LocationQuery, WeatherError, WeatherSnapshot,
};

const UNITS: &str = "metric";

#[derive(Clone)]
pub struct WeatherProvider {
    fetcher: Arc<dyn HttpFetch>,
    base_url: String,
    icon_base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for WeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherProvider")
            .field("base_url", &self.base_url)
            .field("icon_base_url", &self.icon_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl WeatherProvider {
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        base_url: impl Into<String>,
        icon_base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            icon_base_url: icon_base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &WeatherConfig, fetcher: Arc<dyn HttpFetch>) -> Self {
        if config.effective_api_key().is_none() {
            tracing::warn!("No weather API key configured; upstream will reject requests");
        }
        Self::new(
            fetcher,
            config.base_url.clone(),
            config.icon_base_url.clone(),
            config.effective_api_key(),
        )
    }

    pub fn icon_base_url(&self) -> &str {
        &self.icon_base_url
    }

    /// Large icon for the headline card
    pub fn icon_url(&self, icon: &str) -> String {
        format!("{}/{}@2x.png", self.icon_base_url, icon)
    }

    fn endpoint(&self, name: &str, mut params: Vec<(&str, String)>) -> Result<HttpRequest, WeatherError> {
        if let Some(key) = &self.api_key {
            params.push(("appid", key.clone()));
        }
        let url = Url::parse_with_params(&format!("{}/{}", self.base_url, name), &params)
            .map_err(|e| WeatherError::InvalidRequest(e.to_string()))?;
        Ok(HttpRequest::get(url))
    }

    fn coordinate_params(coords: Coordinates) -> Vec<(&'static str, String)> {
        vec![("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
    }

    /// Current conditions for a city or coordinate pair.
    ///
    /// Any non-success status is reported as `NotFound`.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        let mut params = match query {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(coords) => Self::coordinate_params(*coords),
        };
        params.push(("units", UNITS.to_string()));
        let request = self.endpoint("weather", params)?;

        let response = self.fetcher.fetch(&request).await?;
        if !response.is_success() {
            tracing::info!(status = response.status, "Current conditions not found");
            return Err(WeatherError::NotFound {
                status: response.status,
            });
        }

        let body: CurrentResponse = response.json()?;
        WeatherSnapshot::try_from(body)
    }

    /// AQI index at the coordinates; `Ok(None)` when the response carries none
    #[instrument(skip(self), level = "info")]
    pub async fn air_quality(&self, coords: Coordinates) -> Result<Option<i64>, WeatherError> {
        let request = self.endpoint("air_pollution", Self::coordinate_params(coords))?;

        let response = self.fetcher.fetch(&request).await?;
        if !response.is_success() {
            return Err(WeatherError::NotFound {
                status: response.status,
            });
        }

        let body: AirPollutionResponse = response.json()?;
        Ok(body
            .list
            .into_iter()
            .next()
            .and_then(|entry| entry.main)
            .and_then(|main| main.aqi))
    }

    /// Full 3-hour forecast series, in upstream (chronological) order
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, coords: Coordinates) -> Result<Vec<ForecastEntry>, WeatherError> {
        let mut params = Self::coordinate_params(coords);
        params.push(("units", UNITS.to_string()));
        let request = self.endpoint("forecast", params)?;

        let response = self.fetcher.fetch(&request).await?;
        if !response.is_success() {
            return Err(WeatherError::NotFound {
                status: response.status,
            });
        }

        let body: ForecastResponse = response.json()?;
        Ok(body.list.into_iter().map(ForecastEntry::from).collect())
    }
}
