use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skycast_core::{Config, HttpFetch, HttpRequest, ReqwestFetcher};
use skycast_ui::app_context::build_cache_worker;
use skycast_ui::{
    dispatch, render_text, AppContext, Command, Dispatched, IntoAppError, WeatherServiceMessage,
};

/// Upper bound on waiting for a lookup to report back
const LOOKUP_WAIT: Duration = Duration::from_secs(300);

#[derive(Parser, Debug)]
#[command(name = "skycast", version)]
#[command(about = "Current weather, air quality and a 5-day forecast (OpenWeatherMap)")]
struct Cli {
    /// Route weather requests through the offline cache
    #[arg(long, global = true)]
    offline: bool,

    /// Print the view as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to <config dir>/skycast/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Look up a city by name
    Search {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Look up a coordinate pair
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Look up the configured device location
    Locate,
    /// Manage the offline asset cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Download the asset manifest into the current cache
    Install,
    /// Delete every cache but the current one
    Activate,
    /// Fetch a URL through the cache worker
    Fetch { url: String },
    /// List cached URLs
    List,
}

fn main() -> Result<()> {
    skycast_core::init()?;
    let cli = Cli::parse();

    let (config, _) = Config::load_validated(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skycast-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let flags = LookupFlags {
        offline: cli.offline,
        json: cli.json,
    };
    match cli.command {
        Cmd::Cache { action } => runtime.block_on(run_cache(&config, action)),
        Cmd::Search { city } => {
            run_lookup(&config, &runtime, flags, Command::Search(city.join(" ")))
        }
        Cmd::Coords { lat, lon } => {
            run_lookup(&config, &runtime, flags, Command::SearchCoordinates { lat, lon })
        }
        Cmd::Locate => run_lookup(&config, &runtime, flags, Command::LocateMe),
    }
}

#[derive(Debug, Clone, Copy)]
struct LookupFlags {
    offline: bool,
    json: bool,
}

fn run_lookup(
    config: &Config,
    runtime: &tokio::runtime::Runtime,
    flags: LookupFlags,
    command: Command,
) -> Result<()> {
    let ctx = AppContext::from_config(config, runtime.handle().clone(), flags.offline)?;

    match dispatch(&ctx, command) {
        Dispatched::LookupStarted => match ctx.wait_weather_message(LOOKUP_WAIT) {
            Some(WeatherServiceMessage::LookupDone { query, outcome }) => {
                tracing::debug!(%query, ?outcome, "Lookup reported back");
            }
            Some(WeatherServiceMessage::LocateFailed(e)) => {
                tracing::debug!(error = %e.clone().into_app_error(), "Locate failed");
            }
            None => anyhow::bail!("Timed out waiting for the weather service"),
        },
        Dispatched::Ignored => {
            println!("Nothing to look up");
            return Ok(());
        }
        Dispatched::Notified(_) | Dispatched::ThemeChanged(_) => {}
    }

    let view = ctx.view();
    if let Some(note) = view.dismiss_notification() {
        eprintln!("{}", note);
    }

    let state = view.snapshot();
    if flags.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render_text(&state));
    }
    Ok(())
}

async fn run_cache(config: &Config, action: CacheAction) -> Result<()> {
    let network: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(config.weather.timeout())?);
    let worker = build_cache_worker(config, network)?;

    match action {
        CacheAction::Install => match worker.install(&config.offline.assets).await {
            Ok(count) => println!("Installed {} assets into {}", count, worker.cache_name()),
            Err(e) => {
                let message = e.user_message();
                tracing::error!(error = %e.into_app_error(), "Install failed");
                anyhow::bail!(message);
            }
        },
        CacheAction::Activate => {
            let removed = worker.activate().map_err(|e| e.into_app_error())?;
            if removed.is_empty() {
                println!("{} is the only cache", worker.cache_name());
            } else {
                println!("Deleted {}; {} is current", removed.join(", "), worker.cache_name());
            }
        }
        CacheAction::Fetch { url } => {
            let request = HttpRequest::parse(&url)?;
            let response = worker.fetch(&request).await.map_err(|e| {
                let message = e.user_message();
                anyhow::Error::new(e).context(message)
            })?;
            eprintln!(
                "{} {}",
                response.status,
                response.content_type.as_deref().unwrap_or("")
            );
            print!("{}", response.text());
        }
        CacheAction::List => {
            for url in worker.cached_urls().map_err(|e| e.into_app_error())? {
                println!("{}", url);
            }
        }
    }
    Ok(())
}
