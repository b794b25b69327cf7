//! Application shell for SkyCast: context, commands, view model and rendering.

pub mod app_context;
pub mod commands;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod services;

pub use app_context::AppContext;
pub use commands::{dispatch, Command, Dispatched};
pub use error_mapping::IntoAppError;
pub use models::{SharedView, Theme, ViewState};
pub use render::render_text;
pub use services::WeatherServiceMessage;
