//! Application context: everything a command needs, built once at startup.
//!
//! The context does not own the tokio runtime. The binary builds one and
//! hands its `Handle` in; tests pass the handle of their own runtime.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use skycast_core::{Config, HttpFetch, ReqwestFetcher};
use skycast_offline::{CacheWorker, SqliteCacheStorage};
use skycast_weather::{location, GeolocationSource, WeatherPipeline, WeatherProvider};
use tokio::runtime::Handle;

use crate::models::{SharedView, Theme};
use crate::services::WeatherServiceMessage;

pub struct AppContext {
    runtime: Handle,
    pipeline: Arc<WeatherPipeline>,
    view: SharedView,
    geolocation: Arc<dyn GeolocationSource>,

    /// Set when weather requests are routed through the offline cache
    cache_worker: RwLock<Option<Arc<CacheWorker>>>,

    weather_service_tx: Sender<WeatherServiceMessage>,
    weather_service_rx: Mutex<Receiver<WeatherServiceMessage>>,
}

impl AppContext {
    pub fn new(
        runtime: Handle,
        pipeline: WeatherPipeline,
        geolocation: Arc<dyn GeolocationSource>,
        theme: Theme,
    ) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self {
            runtime,
            pipeline: Arc::new(pipeline),
            view: SharedView::new(theme),
            geolocation,
            cache_worker: RwLock::new(None),
            weather_service_tx: tx,
            weather_service_rx: Mutex::new(rx),
        }
    }

    /// Build the context from configuration.
    ///
    /// With `offline` set, the network transport is wrapped by a cache
    /// worker backed by the SQLite store in the config directory.
    pub fn from_config(config: &Config, runtime: Handle, offline: bool) -> Result<Self> {
        let network: Arc<dyn HttpFetch> = Arc::new(
            ReqwestFetcher::new(config.weather.timeout()).context("Failed to build HTTP client")?,
        );

        let worker = if offline {
            Some(Arc::new(build_cache_worker(config, network.clone())?))
        } else {
            None
        };

        let fetcher: Arc<dyn HttpFetch> = match &worker {
            Some(worker) => worker.clone() as Arc<dyn HttpFetch>,
            None => network,
        };

        let provider = WeatherProvider::from_config(&config.weather, fetcher);
        let geolocation: Arc<dyn GeolocationSource> =
            Arc::from(location::from_config(config.location.as_ref()));

        let ctx = Self::new(
            runtime,
            WeatherPipeline::new(provider),
            geolocation,
            Theme::from_dark_mode(config.ui.dark_mode),
        );
        ctx.set_cache_worker(worker);

        tracing::info!(offline, "Application context initialized");
        Ok(ctx)
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub fn pipeline(&self) -> Arc<WeatherPipeline> {
        self.pipeline.clone()
    }

    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    pub fn geolocation(&self) -> Arc<dyn GeolocationSource> {
        self.geolocation.clone()
    }

    // =========== Offline Cache ===========

    pub fn cache_worker(&self) -> Option<Arc<CacheWorker>> {
        self.cache_worker.read().clone()
    }

    pub fn set_cache_worker(&self, worker: Option<Arc<CacheWorker>>) {
        *self.cache_worker.write() = worker;
    }

    pub fn is_offline_enabled(&self) -> bool {
        self.cache_worker.read().is_some()
    }

    // =========== Weather Service Channel ===========

    pub fn weather_service_tx(&self) -> Sender<WeatherServiceMessage> {
        self.weather_service_tx.clone()
    }

    /// Try to receive a message from the weather service channel (non-blocking).
    pub fn try_recv_weather_message(&self) -> Option<WeatherServiceMessage> {
        self.weather_service_rx.lock().try_recv().ok()
    }

    /// Block the calling thread until a weather message arrives.
    ///
    /// Must not be called from inside the runtime.
    pub fn wait_weather_message(&self, timeout: Duration) -> Option<WeatherServiceMessage> {
        self.weather_service_rx.lock().recv_timeout(timeout).ok()
    }
}

/// Cache worker over `network`, storing into the configured SQLite file.
pub fn build_cache_worker(config: &Config, network: Arc<dyn HttpFetch>) -> Result<CacheWorker> {
    let db_path = config.offline_database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory {:?}", parent))?;
    }

    let storage = SqliteCacheStorage::new(&db_path)
        .with_context(|| format!("Failed to open offline cache at {:?}", db_path))?;
    tracing::info!("Offline cache opened at {:?}", db_path);

    CacheWorker::from_config(&config.offline, network, Arc::new(storage))
        .context("Invalid offline cache configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            config_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_from_config_online() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::from_config(&config_in(dir.path()), Handle::current(), false).unwrap();

        assert!(!ctx.is_offline_enabled());
        assert_eq!(ctx.view().theme(), Theme::Dark);
        assert!(!ctx.geolocation().is_available());
        assert!(ctx.try_recv_weather_message().is_none());
    }

    #[tokio::test]
    async fn test_from_config_offline_opens_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.ui.dark_mode = false;
        config.location = Some(skycast_core::LocationConfig {
            latitude: 48.85,
            longitude: 2.35,
        });

        let ctx = AppContext::from_config(&config, Handle::current(), true).unwrap();

        assert!(ctx.is_offline_enabled());
        assert_eq!(ctx.cache_worker().unwrap().cache_name(), "skycast-v1");
        assert!(config.offline_database_path().exists());
        assert_eq!(ctx.view().theme(), Theme::Light);
        assert!(ctx.geolocation().is_available());
    }
}
