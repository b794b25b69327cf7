//! Geolocation sources.

use async_trait::async_trait;
use skycast_core::LocationConfig;

use crate::types::{Coordinates, LocationError};

/// Supplies the device position, or a user-facing denial
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;

    /// False when no position can ever be produced
    fn is_available(&self) -> bool {
        true
    }
}

/// Position pinned in configuration
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            coordinates: Coordinates { lat, lon },
        }
    }
}

#[async_trait]
impl GeolocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

/// Used when the platform has no geolocation at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl GeolocationSource for NoGeolocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Pick the source that matches the configuration
pub fn from_config(location: Option<&LocationConfig>) -> Box<dyn GeolocationSource> {
    match location {
        Some(loc) => Box::new(FixedLocation::new(loc.latitude, loc.longitude)),
        None => Box::new(NoGeolocation),
    }
}
