//! Weather lookup for SkyCast
//!
//! Fetches current conditions, air quality and a 5-day forecast from
//! OpenWeatherMap and renders them into a [`WeatherView`].

pub mod aqi;
pub mod effects;
pub mod forecast;
pub mod gauge;
pub mod location;
pub mod pipeline;
pub mod provider;
pub mod types;
pub mod view;

pub use aqi::{AqiDisplay, AqiLevel};
pub use effects::{Background, Particle, Precipitation};
pub use forecast::{ForecastCard, ForecastRegion};
pub use gauge::WindGauge;
pub use location::{FixedLocation, GeolocationSource, NoGeolocation};
pub use pipeline::{LookupOutcome, WeatherPipeline};
pub use provider::WeatherProvider;
pub use types::*;
pub use view::{SunTimes, WeatherCard, WeatherView};
