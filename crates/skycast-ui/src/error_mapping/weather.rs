use skycast_core::{AppError, NetworkError, WeatherError as CoreWeatherError};
use skycast_weather::{LocationError, WeatherError};

use super::IntoAppError;

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::NotFound { status: 401 } => {
                AppError::Weather(CoreWeatherError::InvalidApiKey)
            }
            WeatherError::NotFound { status } if status >= 500 => {
                AppError::Weather(CoreWeatherError::ServiceUnavailable)
            }
            WeatherError::NotFound { status } => AppError::Weather(
                CoreWeatherError::LocationNotFound(format!("status {}", status)),
            ),
            WeatherError::Network(e) => AppError::Network(e),
            WeatherError::Parse(s) => AppError::Weather(CoreWeatherError::ApiError(s)),
            WeatherError::InvalidRequest(s) => AppError::Network(NetworkError::InvalidUrl(s)),
        }
    }
}

impl IntoAppError for LocationError {
    fn into_app_error(self) -> AppError {
        AppError::Weather(CoreWeatherError::GeolocationUnavailable(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_invalid_key() {
        let err = WeatherError::NotFound { status: 401 }.into_app_error();
        assert!(matches!(err, AppError::Weather(CoreWeatherError::InvalidApiKey)));
    }

    #[test]
    fn test_not_found_maps_to_location_not_found() {
        let err = WeatherError::NotFound { status: 404 }.into_app_error();
        assert_eq!(err.user_message(), "Location not found. Check and try again.");
    }

    #[test]
    fn test_server_failure_maps_to_service_unavailable() {
        let err = WeatherError::NotFound { status: 503 }.into_app_error();
        assert!(matches!(err, AppError::Weather(CoreWeatherError::ServiceUnavailable)));
        assert_eq!(
            err.user_message(),
            "Weather service unavailable. Please try again later."
        );
    }

    #[test]
    fn test_network_error_is_preserved() {
        let err = WeatherError::Network(NetworkError::Timeout).into_app_error();
        assert!(matches!(err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_location_error() {
        let err = LocationError::Unavailable.into_app_error();
        assert_eq!(err.user_message(), "Unable to get location.");
    }
}
