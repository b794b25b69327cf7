//! Weather backend: async lookups.
//! All network work runs on the tokio runtime; completion is sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_weather::{GeolocationSource, LocationError, LocationQuery, LookupOutcome, WeatherPipeline, WeatherView};
use tokio::runtime::Handle;

use crate::models::weather_model::SharedView;

/// Messages sent from async operations back to the caller's thread
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherServiceMessage {
    /// A lookup ran to completion (including rendered failures)
    LookupDone {
        query: LocationQuery,
        outcome: LookupOutcome,
    },
    /// Geolocation failed; the view carries the notification
    LocateFailed(LocationError),
}

/// Run a lookup for `query` in the background.
/// Sends `LookupDone` on the channel when complete.
///
/// Lookups are not cancelled: two in flight race, last write wins.
pub fn request_lookup(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &Handle,
    pipeline: Arc<WeatherPipeline>,
    view: SharedView,
    query: LocationQuery,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let outcome = run_lookup(&pipeline, view, &query).await;
        let _ = tx.send(WeatherServiceMessage::LookupDone { query, outcome });
    });
}

/// Resolve the device position, then look it up.
///
/// A geolocation failure is reported as a notification on the view and no
/// request is made.
pub fn request_locate(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &Handle,
    pipeline: Arc<WeatherPipeline>,
    geolocation: Arc<dyn GeolocationSource>,
    mut view: SharedView,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        match geolocation.current_position().await {
            Ok(coords) => {
                tracing::info!(lat = coords.lat, lon = coords.lon, "Got location");
                let query = LocationQuery::Coordinates(coords);
                let outcome = run_lookup(&pipeline, view, &query).await;
                let _ = tx.send(WeatherServiceMessage::LookupDone { query, outcome });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Geolocation failed");
                view.notify(&e.to_string());
                let _ = tx.send(WeatherServiceMessage::LocateFailed(e));
            }
        }
    });
}

async fn run_lookup(
    pipeline: &WeatherPipeline,
    mut view: SharedView,
    query: &LocationQuery,
) -> LookupOutcome {
    pipeline.lookup(query, &mut view).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_service_message_variants() {
        let done = WeatherServiceMessage::LookupDone {
            query: LocationQuery::city("Paris"),
            outcome: LookupOutcome::Failed,
        };
        assert_ne!(done, WeatherServiceMessage::LocateFailed(LocationError::Unsupported));
    }
}
