pub mod weather_service;

pub use weather_service::{
    request_locate as request_weather_locate, request_lookup as request_weather_lookup,
    WeatherServiceMessage,
};
