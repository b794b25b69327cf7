pub mod weather_model;

pub use weather_model::{SharedView, Theme, ViewState};
