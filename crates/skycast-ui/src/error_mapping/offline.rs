use skycast_core::error::RusqliteErrorExt;
use skycast_core::{AppError, CacheError, ConfigError};
use skycast_offline::OfflineError;

use super::IntoAppError;

impl IntoAppError for OfflineError {
    fn into_app_error(self) -> AppError {
        match self {
            OfflineError::AssetUnreachable { url, source } => {
                AppError::Cache(CacheError::InstallFailed(format!("{}: {}", url, source)))
            }
            OfflineError::AssetStatus { url, status } => {
                AppError::Cache(CacheError::InstallFailed(format!("{}: status {}", url, status)))
            }
            OfflineError::InvalidPath(s) | OfflineError::InvalidOrigin(s) => {
                AppError::Config(ConfigError::Invalid(s))
            }
            OfflineError::Database(e) => AppError::Cache(e.into_cache_error()),
            OfflineError::Storage(s) => AppError::Cache(CacheError::Storage(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_failures_map_to_install_failed() {
        let err = OfflineError::AssetStatus {
            url: "http://localhost:8080/style.css".into(),
            status: 500,
        }
        .into_app_error();
        assert!(matches!(err, AppError::Cache(CacheError::InstallFailed(ref m)) if m.contains("500")));
    }

    #[test]
    fn test_bad_origin_is_config_error() {
        let err = OfflineError::InvalidOrigin("nope".into()).into_app_error();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_storage_error() {
        let err = OfflineError::Storage("locked".into()).into_app_error();
        assert_eq!(err.user_message(), "The offline cache could not be accessed.");
    }
}
