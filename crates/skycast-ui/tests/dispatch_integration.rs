//! End-to-end tests: command dispatch through the weather service into the
//! shared view, against a wiremock upstream.
//!
//! The test thread plays the UI thread: it owns the runtime and blocks on the
//! service channel while lookups run on the runtime's workers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use skycast_core::{HttpFetch, ReqwestFetcher};
use skycast_offline::{CacheWorker, MemoryCacheStorage};
use skycast_ui::{dispatch, render_text, AppContext, Command, Dispatched, Theme, WeatherServiceMessage};
use skycast_weather::{
    Background, Coordinates, FixedLocation, GeolocationSource, LocationError, LocationQuery,
    LookupOutcome, NoGeolocation, WeatherPipeline, WeatherProvider,
};
use tokio::runtime::Runtime;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(10);

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

async fn upstream() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": { "lon": 2.35, "lat": 48.85 },
            "weather": [{ "main": "Snow", "description": "light snow", "icon": "13d" }],
            "main": { "temp": -1.4 },
            "wind": { "speed": 40.0 },
            "sys": { "country": "FR", "sunrise": 1_700_000_000i64, "sunset": 1_700_030_000i64 },
            "name": "Paris"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "list": [{ "main": { "aqi": 5 } }] })),
        )
        .mount(&server)
        .await;
    let list: Vec<_> = (0..40)
        .map(|i| {
            serde_json::json!({
                "dt": 1_704_067_200i64 + i * 10_800,
                "main": { "temp": 0.5 },
                "weather": [{ "main": "Snow", "description": "snow", "icon": "13d" }]
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": list })))
        .mount(&server)
        .await;
    server
}

fn pipeline_over(fetcher: Arc<dyn HttpFetch>, server: &MockServer) -> WeatherPipeline {
    WeatherPipeline::new(WeatherProvider::new(
        fetcher,
        format!("{}/data/2.5", server.uri()),
        "https://openweathermap.org/img/wn",
        Some("test-key".to_string()),
    ))
}

fn network() -> Arc<dyn HttpFetch> {
    Arc::new(ReqwestFetcher::new(None).unwrap())
}

struct DeniedLocation;

#[async_trait]
impl GeolocationSource for DeniedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

#[test]
fn test_search_renders_into_view() {
    let rt = runtime();
    let server = rt.block_on(upstream());
    let ctx = AppContext::new(
        rt.handle().clone(),
        pipeline_over(network(), &server),
        Arc::new(NoGeolocation),
        Theme::Dark,
    );

    assert_eq!(
        dispatch(&ctx, Command::Search("  Paris ".into())),
        Dispatched::LookupStarted
    );
    let message = ctx.wait_weather_message(WAIT).unwrap();
    assert_eq!(
        message,
        WeatherServiceMessage::LookupDone {
            query: LocationQuery::city("Paris"),
            outcome: LookupOutcome::Rendered {
                air_quality: true,
                forecast: true
            },
        }
    );

    let state = ctx.view().snapshot();
    assert_eq!(state.lookups, 1);
    assert!(!state.loading);
    assert_eq!(state.card.as_ref().unwrap().temperature, -1);
    assert_eq!(state.background, Some(Background::Snow));
    assert!(state.precipitation.particle_count() > 0);
    assert_eq!(state.wind.as_ref().unwrap().angle, 90.0);
    assert_eq!(state.air_quality.as_ref().unwrap().label(), "Very Poor");
    assert_eq!(state.forecast.as_ref().unwrap().cards().len(), 5);

    let text = render_text(&state);
    assert!(text.contains("Paris, FR  -1°C  light snow"));
    assert!(text.contains("AQI 5 Very Poor (#F44336)"));
}

#[test]
fn test_locate_me_looks_up_coordinates() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = upstream().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coord": { "lon": 2.35, "lat": 48.85 },
                "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }],
                "main": { "temp": 21.0 },
                "sys": { "sunrise": 1_700_000_000i64, "sunset": 1_700_030_000i64 },
                "name": "Paris"
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        server
    });
    let ctx = AppContext::new(
        rt.handle().clone(),
        pipeline_over(network(), &server),
        Arc::new(FixedLocation::new(48.85, 2.35)),
        Theme::Light,
    );

    assert_eq!(dispatch(&ctx, Command::LocateMe), Dispatched::LookupStarted);
    let message = ctx.wait_weather_message(WAIT).unwrap();
    assert!(matches!(
        message,
        WeatherServiceMessage::LookupDone {
            query: LocationQuery::Coordinates(_),
            ..
        }
    ));

    let state = ctx.view().snapshot();
    assert_eq!(state.card.as_ref().unwrap().place, "Paris");
    assert_eq!(state.background, Some(Background::Clear));
    assert_eq!(state.wind.as_ref().unwrap().angle, -90.0);
    assert_eq!(state.theme, Theme::Light);
}

#[test]
fn test_locate_failure_notifies_without_request() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    });
    let ctx = AppContext::new(
        rt.handle().clone(),
        pipeline_over(network(), &server),
        Arc::new(DeniedLocation),
        Theme::Dark,
    );

    assert_eq!(dispatch(&ctx, Command::LocateMe), Dispatched::LookupStarted);
    assert_eq!(
        ctx.wait_weather_message(WAIT),
        Some(WeatherServiceMessage::LocateFailed(LocationError::Unavailable))
    );
    assert_eq!(
        ctx.view().dismiss_notification().as_deref(),
        Some("Unable to get location")
    );
    assert_eq!(ctx.view().snapshot().lookups, 0);

    rt.block_on(server.verify());
}

#[test]
fn test_coordinate_search_not_found() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    });
    let ctx = AppContext::new(
        rt.handle().clone(),
        pipeline_over(network(), &server),
        Arc::new(NoGeolocation),
        Theme::Dark,
    );

    dispatch(&ctx, Command::SearchCoordinates { lat: 0.0, lon: 0.0 });
    let message = ctx.wait_weather_message(WAIT).unwrap();
    assert!(matches!(
        message,
        WeatherServiceMessage::LookupDone {
            outcome: LookupOutcome::Failed,
            ..
        }
    ));

    let state = ctx.view().snapshot();
    assert_eq!(state.error.as_deref(), Some("Location weather not found"));
    assert_eq!(state.background, Some(Background::Neutral));
    assert!(state.card.is_none());
}

#[test]
fn test_lookup_through_cache_worker() {
    let rt = runtime();
    let server = rt.block_on(upstream());
    let worker = Arc::new(
        CacheWorker::new(
            network(),
            Arc::new(MemoryCacheStorage::new()),
            "skycast-v1",
            Url::parse("http://localhost:8080").unwrap(),
            "/index.html",
        )
        .unwrap(),
    );
    let ctx = AppContext::new(
        rt.handle().clone(),
        pipeline_over(worker.clone(), &server),
        Arc::new(NoGeolocation),
        Theme::Dark,
    );
    ctx.set_cache_worker(Some(worker.clone()));

    dispatch(&ctx, Command::Search("Paris".into()));
    ctx.wait_weather_message(WAIT).unwrap();

    assert!(ctx.is_offline_enabled());
    assert!(ctx.view().snapshot().has_weather());
    // API responses are never cached
    assert!(worker.cached_urls().unwrap().is_empty());
}
