//! The surface a lookup renders into.

use serde::{Deserialize, Serialize};

use crate::aqi::AqiDisplay;
use crate::effects::{Background, Precipitation};
use crate::forecast::ForecastRegion;
use crate::gauge::WindGauge;

/// Headline card for the current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCard {
    /// "Paris, FR"
    pub place: String,
    pub temperature: i64,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

/// Write side of the weather display.
///
/// The pipeline only ever writes; every lookup starts with `begin_lookup`,
/// which must discard everything the previous lookup rendered.
pub trait WeatherView: Send {
    fn begin_lookup(&mut self);
    fn set_loading(&mut self, loading: bool);
    fn show_error(&mut self, message: &str, background: Background);
    fn show_weather(&mut self, card: WeatherCard);
    fn show_sun_times(&mut self, sun: SunTimes);
    fn show_wind(&mut self, gauge: WindGauge);
    fn set_background(&mut self, background: Background, precipitation: Precipitation);
    fn show_air_quality(&mut self, aqi: AqiDisplay);
    fn show_forecast(&mut self, forecast: ForecastRegion);
    /// Blocking user notification (geolocation failures)
    fn notify(&mut self, message: &str);
}
