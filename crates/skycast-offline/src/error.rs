//! Offline-cache error types.

use skycast_core::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("Asset unreachable: {url}: {source}")]
    AssetUnreachable {
        url: String,
        #[source]
        source: NetworkError,
    },

    #[error("Asset {url} returned status {status}")]
    AssetStatus { url: String, status: u16 },

    #[error("Invalid asset path: {0}")]
    InvalidPath(String),

    #[error("Invalid app origin: {0}")]
    InvalidOrigin(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache error: {0}")]
    Storage(String),
}

impl OfflineError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::AssetUnreachable { url, .. } => {
                format!("Could not download {}. Check your connection.", url)
            }
            Self::AssetStatus { url, status } => {
                format!("Could not download {} (status {}).", url, status)
            }
            Self::InvalidPath(path) => format!("Invalid asset path: {}", path),
            Self::InvalidOrigin(_) => "The app origin is not a valid URL".to_string(),
            Self::Database(_) | Self::Storage(_) => "Local cache error".to_string(),
        }
    }

    /// Whether this error aborted an install without writing anything.
    pub fn is_install_failure(&self) -> bool {
        matches!(
            self,
            Self::AssetUnreachable { .. } | Self::AssetStatus { .. } | Self::InvalidPath(_)
        )
    }
}
