//! Plain-text rendering of the view state for terminals.

use std::fmt::Write;

use skycast_weather::{AqiDisplay, ForecastRegion};

use crate::models::ViewState;

pub fn render_text(state: &ViewState) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_view(&mut out, state);
    out
}

fn write_view(out: &mut String, state: &ViewState) -> std::fmt::Result {
    writeln!(out, "[{}]", state.theme.glyph())?;

    if let Some(note) = &state.notification {
        writeln!(out, "! {}", note)?;
    }
    if state.loading {
        writeln!(out, "Loading...")?;
    }
    if let Some(error) = &state.error {
        writeln!(out, "{}", error)?;
    }

    if let Some(card) = &state.card {
        writeln!(out, "{}  {}°C  {}", card.place, card.temperature, card.description)?;
        writeln!(out, "  icon: {}", card.icon_url)?;
    }
    if let Some(sun) = &state.sun {
        writeln!(out, "  sunrise {}  sunset {}", sun.sunrise, sun.sunset)?;
    }
    if let Some(wind) = &state.wind {
        writeln!(out, "  wind {} (needle {:.0}°)", wind.label, wind.angle)?;
    }
    if let Some(background) = state.background {
        write!(out, "  background {}", background.gradient())?;
        if state.precipitation.is_active() {
            write!(out, " with {} particles", state.precipitation.particle_count())?;
        }
        writeln!(out)?;
    }

    match &state.air_quality {
        Some(aqi @ AqiDisplay::Reading { .. }) => writeln!(
            out,
            "  AQI {} {} ({})",
            aqi.value_text(),
            aqi.label(),
            aqi.color().unwrap_or("-")
        )?,
        Some(aqi) => writeln!(out, "  {} {}", aqi.label(), aqi.value_text())?,
        None => {}
    }

    match &state.forecast {
        Some(ForecastRegion::Cards(cards)) => {
            for card in cards {
                writeln!(out, "  {}  {:>4}°C  {}", card.day, card.temperature, card.icon_url)?;
            }
        }
        Some(ForecastRegion::Unavailable) => writeln!(out, "  Forecast unavailable")?,
        None => {}
    }

    Ok(())
}
