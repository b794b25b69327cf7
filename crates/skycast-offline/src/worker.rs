//! Install, activate and network-first fetch over one versioned cache.

use std::sync::Arc;

use async_trait::async_trait;
use skycast_core::{HttpFetch, HttpRequest, HttpResponse, NetworkError, OfflineConfig};
use tracing::instrument;
use url::Url;

use crate::error::OfflineError;
use crate::storage::{CacheStorage, CachedEntry};

/// Intercepts requests on their way to the network.
///
/// Only static assets fetched during [`install`](Self::install) are ever
/// stored; responses that pass through [`HttpFetch::fetch`] are not.
pub struct CacheWorker {
    network: Arc<dyn HttpFetch>,
    storage: Arc<dyn CacheStorage>,
    cache_name: String,
    origin: Url,
    fallback_url: Url,
}

impl std::fmt::Debug for CacheWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheWorker")
            .field("cache_name", &self.cache_name)
            .field("origin", &self.origin.as_str())
            .field("fallback_url", &self.fallback_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Requests differing only in fragment share an entry.
fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

impl CacheWorker {
    pub fn new(
        network: Arc<dyn HttpFetch>,
        storage: Arc<dyn CacheStorage>,
        cache_name: impl Into<String>,
        origin: Url,
        fallback_document: &str,
    ) -> Result<Self, OfflineError> {
        let fallback_url = origin
            .join(fallback_document)
            .map_err(|e| OfflineError::InvalidPath(format!("{}: {}", fallback_document, e)))?;
        Ok(Self {
            network,
            storage,
            cache_name: cache_name.into(),
            origin,
            fallback_url,
        })
    }

    pub fn from_config(
        config: &OfflineConfig,
        network: Arc<dyn HttpFetch>,
        storage: Arc<dyn CacheStorage>,
    ) -> Result<Self, OfflineError> {
        let origin = Url::parse(&config.app_origin)
            .map_err(|e| OfflineError::InvalidOrigin(format!("{}: {}", config.app_origin, e)))?;
        Self::new(
            network,
            storage,
            config.cache_name.clone(),
            origin,
            &config.fallback_document,
        )
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// URLs currently stored in the live cache.
    pub fn cached_urls(&self) -> Result<Vec<String>, OfflineError> {
        self.storage.keys(&self.cache_name)
    }

    /// Resolve a manifest path against the app origin.
    fn asset_url(&self, path: &str) -> Result<Url, OfflineError> {
        if !path.starts_with('/') {
            return Err(OfflineError::InvalidPath(path.to_string()));
        }
        self.origin
            .join(path)
            .map_err(|e| OfflineError::InvalidPath(format!("{}: {}", path, e)))
    }

    /// Download every asset and store them in the live cache.
    ///
    /// Any unreachable asset or non-success status aborts the install and
    /// leaves storage untouched. Returns the number of stored entries.
    #[instrument(skip(self, assets), fields(cache = %self.cache_name, assets = assets.len()))]
    pub async fn install(&self, assets: &[String]) -> Result<usize, OfflineError> {
        let mut entries = Vec::with_capacity(assets.len());

        for path in assets {
            let url = self.asset_url(path)?;
            let response = self
                .network
                .fetch(&HttpRequest::get(url.clone()))
                .await
                .map_err(|source| OfflineError::AssetUnreachable {
                    url: url.to_string(),
                    source,
                })?;

            if !response.is_success() {
                return Err(OfflineError::AssetStatus {
                    url: url.to_string(),
                    status: response.status,
                });
            }

            entries.push(CachedEntry {
                url: cache_key(&url),
                response,
            });
        }

        self.storage.put_all(&self.cache_name, &entries)?;
        tracing::info!(stored = entries.len(), "Offline assets installed");
        Ok(entries.len())
    }

    /// Delete every cache except the live one. Returns the deleted names.
    #[instrument(skip(self), fields(cache = %self.cache_name))]
    pub fn activate(&self) -> Result<Vec<String>, OfflineError> {
        let mut removed = Vec::new();
        for name in self.storage.cache_names()? {
            if name == self.cache_name {
                continue;
            }
            if self.storage.delete_cache(&name)? {
                tracing::info!(stale = %name, "Deleted stale cache");
                removed.push(name);
            }
        }
        Ok(removed)
    }

    /// Cached stand-in for `request`, if one exists.
    fn fallback_for(&self, request: &HttpRequest) -> Option<HttpResponse> {
        let key = if request.is_same_origin(&self.origin) {
            cache_key(&request.url)
        } else {
            cache_key(&self.fallback_url)
        };

        match self.storage.lookup(&self.cache_name, &key) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl HttpFetch for CacheWorker {
    /// Network first; on transport failure, the cached copy (same origin)
    /// or the cached fallback document (any other origin).
    #[instrument(skip(self, request), fields(url = %request.url), level = "debug")]
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        let error = match self.network.fetch(request).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        match self.fallback_for(request) {
            Some(response) => {
                tracing::info!(error = %error, "Network unavailable, served from cache");
                Ok(response)
            }
            None => {
                tracing::debug!(error = %error, "Network unavailable, nothing cached");
                Err(error)
            }
        }
    }
}
