use serde::{Deserialize, Serialize};
use skycast_core::NetworkError;

/// What the user asked for: a free-text place or a coordinate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Build a city query; surrounding whitespace is dropped
    pub fn city(text: impl AsRef<str>) -> Self {
        Self::City(text.as_ref().trim().to_string())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::Coordinates(Coordinates { lat, lon })
    }

    /// Empty city text never reaches the network
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::City(name) if name.trim().is_empty())
    }

    /// Message shown when the upstream rejects the query
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Self::City(_) => "City not found",
            Self::Coordinates(_) => "Location weather not found",
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::City(name) => write!(f, "{}", name),
            Self::Coordinates(c) => write!(f, "{:.4}, {:.4}", c.lat, c.lon),
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions, derived from one successful lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
    /// Open vocabulary ("Rain", "Snow", "Clouds", "Clear", "Mist", ...)
    pub condition: String,
    pub icon: String,
    pub coordinates: Coordinates,
    pub sunrise: i64,
    pub sunset: i64,
    pub wind_speed: f64,
}

impl WeatherSnapshot {
    /// "Paris, FR"; just the name when upstream gives no country
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temperature: f64,
    pub icon: Option<String>,
}

// Upstream wire format (OpenWeatherMap 2.5)

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub name: String,
    pub sys: SysSection,
    pub main: MainSection,
    #[serde(default)]
    pub weather: Vec<ConditionSection>,
    pub coord: CoordSection,
    pub wind: Option<WindSection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SysSection {
    #[serde(default)]
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainSection {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionSection {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoordSection {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindSection {
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirPollutionEntry {
    pub main: Option<AirPollutionMain>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirPollutionMain {
    pub aqi: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastItem {
    pub dt: i64,
    pub main: MainSection,
    #[serde(default)]
    pub weather: Vec<ConditionSection>,
}

impl TryFrom<CurrentResponse> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(resp: CurrentResponse) -> Result<Self, Self::Error> {
        let condition = resp
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response has no weather condition".into()))?;

        Ok(Self {
            name: resp.name,
            country: resp.sys.country.unwrap_or_default(),
            temperature: resp.main.temp,
            description: condition.description,
            condition: condition.main,
            icon: condition.icon,
            coordinates: Coordinates {
                lat: resp.coord.lat,
                lon: resp.coord.lon,
            },
            sunrise: resp.sys.sunrise,
            sunset: resp.sys.sunset,
            wind_speed: resp.wind.and_then(|w| w.speed).unwrap_or(0.0),
        })
    }
}

impl From<ForecastItem> for ForecastEntry {
    fn from(item: ForecastItem) -> Self {
        Self {
            timestamp: item.dt,
            temperature: item.main.temp,
            icon: item.weather.into_iter().next().map(|c| c.icon),
        }
    }
}

/// Geolocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation not supported")]
    Unsupported,
    #[error("Unable to get location")]
    Unavailable,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Upstream returned status {status}")]
    NotFound { status: u16 },
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl WeatherError {
    /// Inline message rendered when the current-conditions step fails
    pub fn message_for(&self, query: &LocationQuery) -> String {
        match self {
            Self::NotFound { .. } => query.not_found_message().to_string(),
            Self::Network(NetworkError::InvalidResponse(_)) | Self::Parse(_) => {
                "Unexpected response from the weather service".to_string()
            }
            Self::Network(e) => e.user_message().to_string(),
            Self::InvalidRequest(_) => query.not_found_message().to_string(),
        }
    }
}

/// Round the way the display does: halves go up (-2.5 becomes -2)
pub fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
