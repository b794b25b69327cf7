//! HTTP transport seam shared by the weather provider and the offline cache.
//!
//! Everything that leaves the process goes through [`HttpFetch`]. The real
//! network is [`ReqwestFetcher`]; the offline cache worker implements the same
//! trait and wraps it, which is how requests get intercepted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{NetworkError, ReqwestErrorExt};

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

/// An outgoing GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self { url }
    }

    /// Parse an absolute URL into a request.
    pub fn parse(url: &str) -> Result<Self, NetworkError> {
        Url::parse(url)
            .map(Self::get)
            .map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// True when scheme, host and port match `origin`.
    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NetworkError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything that can answer an [`HttpRequest`].
///
/// An `Err` means no response was obtained at all (offline, DNS, refused).
/// HTTP error statuses are returned as `Ok` responses.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError>;
}

#[async_trait]
impl<T: HttpFetch + ?Sized> HttpFetch for Arc<T> {
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        (**self).fetch(request).await
    }
}

/// Network transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Arc<Client>,
}

impl ReqwestFetcher {
    /// Build a fetcher; `None` leaves requests without a timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, NetworkError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| e.into_network_error())?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    #[tracing::instrument(skip(self, request), fields(host = request.url.host_str().unwrap_or_default(), path = request.url.path()), level = "debug")]
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        let response = self
            .client
            .get(request.url.clone())
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| e.into_network_error())?
            .to_vec();

        tracing::debug!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse::new(status, content_type, body))
    }
}
