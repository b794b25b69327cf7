//! User commands and the single table that routes them.

use skycast_weather::{LocationError, LocationQuery, WeatherView};

use crate::app_context::AppContext;
use crate::models::Theme;
use crate::services::{request_weather_locate, request_weather_lookup};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Free text from the search box (typed or dictated)
    Search(String),
    SearchCoordinates { lat: f64, lon: f64 },
    LocateMe,
    ToggleTheme,
}

/// What `dispatch` did with a command
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// A lookup was started; a `WeatherServiceMessage` will follow
    LookupStarted,
    /// Nothing to do (empty search)
    Ignored,
    /// Rejected up front; the view carries the notification
    Notified(LocationError),
    ThemeChanged(Theme),
}

pub fn dispatch(ctx: &AppContext, command: Command) -> Dispatched {
    tracing::debug!(?command, "Dispatching command");
    match command {
        Command::Search(text) => lookup(ctx, LocationQuery::city(text)),
        Command::SearchCoordinates { lat, lon } => lookup(ctx, LocationQuery::coordinates(lat, lon)),
        Command::LocateMe => locate(ctx),
        Command::ToggleTheme => Dispatched::ThemeChanged(ctx.view().toggle_theme()),
    }
}

fn lookup(ctx: &AppContext, query: LocationQuery) -> Dispatched {
    if query.is_empty() {
        return Dispatched::Ignored;
    }
    request_weather_lookup(
        &ctx.weather_service_tx(),
        ctx.runtime(),
        ctx.pipeline(),
        ctx.view(),
        query,
    );
    Dispatched::LookupStarted
}

fn locate(ctx: &AppContext) -> Dispatched {
    let geolocation = ctx.geolocation();
    if !geolocation.is_available() {
        let error = LocationError::Unsupported;
        ctx.view().notify(&error.to_string());
        return Dispatched::Notified(error);
    }
    request_weather_locate(
        &ctx.weather_service_tx(),
        ctx.runtime(),
        ctx.pipeline(),
        geolocation,
        ctx.view(),
    );
    Dispatched::LookupStarted
}
