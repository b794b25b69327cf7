pub mod config;
pub mod error;
pub mod http;

pub use config::{Config, LocationConfig, OfflineConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, CacheError, ConfigError, NetworkError, WeatherError};
pub use http::{HttpFetch, HttpRequest, HttpResponse, ReqwestFetcher};

use anyhow::Result;

/// Initialize logging for the application
///
/// Logs go to stderr; stdout is reserved for command output.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("SkyCast core initialized");
    Ok(())
}
