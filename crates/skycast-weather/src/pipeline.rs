//! The lookup pipeline: current conditions, then air quality and forecast.
//!
//! Step one must succeed before the other two are attempted because they
//! need its coordinates. Steps two and three run concurrently, fail
//! independently and are rendered in whichever order they complete.

use chrono::Local;

use crate::aqi::AqiDisplay;
use crate::effects::{Background, Precipitation};
use crate::forecast::{build_cards, clock_label, ForecastRegion};
use crate::gauge::WindGauge;
use crate::provider::WeatherProvider;
use crate::types::{round_display, Coordinates, LocationQuery, WeatherError, WeatherSnapshot};
use crate::view::{SunTimes, WeatherCard, WeatherView};

/// How far a lookup got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Empty query, nothing happened
    Skipped,
    /// Current conditions failed; nothing else was requested
    Failed,
    Rendered { air_quality: bool, forecast: bool },
}

#[derive(Debug, Clone)]
pub struct WeatherPipeline {
    provider: WeatherProvider,
}

impl WeatherPipeline {
    pub fn new(provider: WeatherProvider) -> Self {
        Self { provider }
    }

    /// Run a full lookup into `view`. Never fails; errors are rendered.
    pub async fn lookup<V: WeatherView + ?Sized>(
        &self,
        query: &LocationQuery,
        view: &mut V,
    ) -> LookupOutcome {
        if query.is_empty() {
            tracing::debug!("Ignoring empty query");
            return LookupOutcome::Skipped;
        }

        tracing::info!(%query, "Weather lookup started");
        view.begin_lookup();

        let snapshot = match self.resolve_current(query).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(%query, error = %e, "Current conditions unavailable");
                view.set_loading(false);
                view.show_error(&e.message_for(query), Background::Neutral);
                return LookupOutcome::Failed;
            }
        };

        view.set_loading(false);
        self.render_current(&snapshot, view);

        let coords = snapshot.coordinates;
        let aqi_step = self.resolve_air_quality(coords);
        let forecast_step = self.resolve_forecast(coords);
        tokio::pin!(aqi_step, forecast_step);

        // Each result is rendered as soon as it arrives
        let mut air_quality: Option<bool> = None;
        let mut forecast: Option<bool> = None;
        while air_quality.is_none() || forecast.is_none() {
            tokio::select! {
                aqi = &mut aqi_step, if air_quality.is_none() => {
                    air_quality = Some(aqi.is_available());
                    view.show_air_quality(aqi);
                }
                region = &mut forecast_step, if forecast.is_none() => {
                    forecast = Some(matches!(region, ForecastRegion::Cards(_)));
                    view.show_forecast(region);
                }
            }
        }

        let outcome = LookupOutcome::Rendered {
            air_quality: air_quality == Some(true),
            forecast: forecast == Some(true),
        };

        tracing::info!(place = %snapshot.display_name(), ?outcome, "Weather lookup finished");
        outcome
    }

    async fn resolve_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        self.provider.current(query).await
    }

    async fn resolve_air_quality(&self, coords: Coordinates) -> AqiDisplay {
        match self.provider.air_quality(coords).await {
            Ok(index) => AqiDisplay::from_index(index),
            Err(e) => {
                tracing::warn!(error = %e, "Air quality unavailable");
                AqiDisplay::Unavailable
            }
        }
    }

    async fn resolve_forecast(&self, coords: Coordinates) -> ForecastRegion {
        match self.provider.forecast(coords).await {
            Ok(entries) => build_cards(&entries, self.provider.icon_base_url(), &Local),
            Err(e) => {
                tracing::warn!(error = %e, "Forecast unavailable");
                ForecastRegion::Unavailable
            }
        }
    }

    fn render_current<V: WeatherView + ?Sized>(&self, snapshot: &WeatherSnapshot, view: &mut V) {
        view.show_weather(WeatherCard {
            place: snapshot.display_name(),
            temperature: round_display(snapshot.temperature),
            description: snapshot.description.clone(),
            icon_url: self.provider.icon_url(&snapshot.icon),
        });
        view.show_sun_times(SunTimes {
            sunrise: clock_label(snapshot.sunrise, &Local),
            sunset: clock_label(snapshot.sunset, &Local),
        });
        view.show_wind(WindGauge::for_speed(snapshot.wind_speed));

        let background = Background::for_condition(&snapshot.condition);
        let precipitation = Precipitation::for_background(background, &mut rand::thread_rng());
        view.set_background(background, precipitation);
    }
}
