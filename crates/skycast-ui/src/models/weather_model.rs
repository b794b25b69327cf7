//! In-memory weather view model.
//!
//! `ViewState` is the full rendered state of the weather screen. The pipeline
//! writes into it through `SharedView`, a cloneable handle that locks per
//! write, so two lookups in flight interleave and the last write wins.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use skycast_weather::{
    AqiDisplay, Background, ForecastRegion, Precipitation, SunTimes, WeatherCard, WeatherView,
    WindGauge,
};

/// Colour scheme of the app shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Glyph on the toggle button: what pressing it switches to.
    pub fn glyph(self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub theme: Theme,
    /// Lookups started since launch
    pub lookups: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub card: Option<WeatherCard>,
    pub sun: Option<SunTimes>,
    pub wind: Option<WindGauge>,
    pub background: Option<Background>,
    pub precipitation: Precipitation,
    pub air_quality: Option<AqiDisplay>,
    pub forecast: Option<ForecastRegion>,
    /// Pending blocking notification
    pub notification: Option<String>,
}

impl ViewState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn has_weather(&self) -> bool {
        self.card.is_some()
    }
}

impl WeatherView for ViewState {
    fn begin_lookup(&mut self) {
        *self = Self {
            theme: self.theme,
            lookups: self.lookups + 1,
            loading: true,
            ..Self::default()
        };
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn show_error(&mut self, message: &str, background: Background) {
        self.error = Some(message.to_string());
        self.background = Some(background);
        self.precipitation = Precipitation::None;
    }

    fn show_weather(&mut self, card: WeatherCard) {
        self.card = Some(card);
    }

    fn show_sun_times(&mut self, sun: SunTimes) {
        self.sun = Some(sun);
    }

    fn show_wind(&mut self, gauge: WindGauge) {
        self.wind = Some(gauge);
    }

    fn set_background(&mut self, background: Background, precipitation: Precipitation) {
        self.background = Some(background);
        self.precipitation = precipitation;
    }

    fn show_air_quality(&mut self, aqi: AqiDisplay) {
        self.air_quality = Some(aqi);
    }

    fn show_forecast(&mut self, forecast: ForecastRegion) {
        self.forecast = Some(forecast);
    }

    fn notify(&mut self, message: &str) {
        self.notification = Some(message.to_string());
    }
}

/// Shared handle to one `ViewState`.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<Mutex<ViewState>>,
}

impl SharedView {
    pub fn new(theme: Theme) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewState::new(theme))),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.inner.lock().clone()
    }

    pub fn theme(&self) -> Theme {
        self.inner.lock().theme
    }

    /// Flip the theme and return the new one.
    pub fn toggle_theme(&self) -> Theme {
        let mut state = self.inner.lock();
        state.theme = state.theme.toggled();
        tracing::debug!(theme = ?state.theme, "Theme toggled");
        state.theme
    }

    /// Take the pending notification, if any.
    pub fn dismiss_notification(&self) -> Option<String> {
        self.inner.lock().notification.take()
    }
}

impl WeatherView for SharedView {
    fn begin_lookup(&mut self) {
        self.inner.lock().begin_lookup();
    }

    fn set_loading(&mut self, loading: bool) {
        self.inner.lock().set_loading(loading);
    }

    fn show_error(&mut self, message: &str, background: Background) {
        self.inner.lock().show_error(message, background);
    }

    fn show_weather(&mut self, card: WeatherCard) {
        self.inner.lock().show_weather(card);
    }

    fn show_sun_times(&mut self, sun: SunTimes) {
        self.inner.lock().show_sun_times(sun);
    }

    fn show_wind(&mut self, gauge: WindGauge) {
        self.inner.lock().show_wind(gauge);
    }

    fn set_background(&mut self, background: Background, precipitation: Precipitation) {
        self.inner.lock().set_background(background, precipitation);
    }

    fn show_air_quality(&mut self, aqi: AqiDisplay) {
        self.inner.lock().show_air_quality(aqi);
    }

    fn show_forecast(&mut self, forecast: ForecastRegion) {
        self.inner.lock().show_forecast(forecast);
    }

    fn notify(&mut self, message: &str) {
        self.inner.lock().notify(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_weather::AqiLevel;

    fn card() -> WeatherCard {
        WeatherCard {
            place: "Paris, FR".into(),
            temperature: 13,
            description: "light rain".into(),
            icon_url: "https://openweathermap.org/img/wn/10d@2x.png".into(),
        }
    }

    #[test]
    fn test_theme_glyphs() {
        assert_eq!(Theme::Dark.glyph(), "☀️");
        assert_eq!(Theme::Light.glyph(), "🌙");
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::from_dark_mode(false), Theme::Light);
    }

    #[test]
    fn test_begin_lookup_resets_everything_but_theme() {
        let mut state = ViewState::new(Theme::Light);
        state.show_weather(card());
        state.show_air_quality(AqiDisplay::from_index(Some(2)));
        state.show_forecast(ForecastRegion::Unavailable);
        state.notify("Unable to get location");
        state.show_error("City not found", Background::Neutral);

        state.begin_lookup();

        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.lookups, 1);
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.card.is_none());
        assert!(state.air_quality.is_none());
        assert!(state.forecast.is_none());
        assert!(state.notification.is_none());
        assert!(state.background.is_none());
    }

    #[test]
    fn test_shared_view_writes_through() {
        let view = SharedView::new(Theme::Dark);
        let mut writer = view.clone();

        writer.begin_lookup();
        writer.show_weather(card());
        writer.show_air_quality(AqiDisplay::Reading {
            index: 3,
            level: AqiLevel::Moderate,
        });
        writer.set_loading(false);

        let state = view.snapshot();
        assert!(state.has_weather());
        assert!(!state.loading);
        assert_eq!(state.air_quality.unwrap().label(), "Moderate");
    }

    #[test]
    fn test_toggle_theme_twice_restores() {
        let view = SharedView::new(Theme::Dark);
        assert_eq!(view.toggle_theme(), Theme::Light);
        assert_eq!(view.theme().glyph(), "🌙");
        assert_eq!(view.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn test_dismiss_notification() {
        let mut view = SharedView::default();
        view.notify("Geolocation not supported");
        assert_eq!(
            view.dismiss_notification().as_deref(),
            Some("Geolocation not supported")
        );
        assert!(view.dismiss_notification().is_none());
    }
}
