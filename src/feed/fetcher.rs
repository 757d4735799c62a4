use super::url::QueryOptions;
use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching a feed.
///
/// None of these are retried; the first failure is returned to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The feed URL could not be parsed
    #[error("Invalid feed URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not valid JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How requests authenticate against the feed service.
///
/// Secrets are held in [`SecretString`] so they never show up in `Debug`
/// output or logs.
#[derive(Debug, Default)]
pub enum Credentials {
    /// No authentication; only public feeds are reachable
    #[default]
    Anonymous,
    /// OAuth2 access token sent as `Authorization: Bearer`
    Bearer(SecretString),
    /// API key sent as the `key` query parameter
    ApiKey(SecretString),
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer(SecretString::from(token.into()))
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey(SecretString::from(key.into()))
    }
}

/// A single feed request handed to a [`Transport`].
#[derive(Debug, Clone, Copy)]
pub struct FeedRequest<'a> {
    pub url: &'a str,
    pub query: &'a QueryOptions,
}

/// Performs HTTP requests and decodes feed bodies into generic JSON trees.
///
/// Implementations own authentication, transport and wire decoding. They
/// must not retry; errors go straight back to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        request: &FeedRequest<'_>,
        credentials: &Credentials,
    ) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request(
        &self,
        request: &FeedRequest<'_>,
        credentials: &Credentials,
    ) -> Result<Value, FetchError> {
        (**self).request(request, credentials).await
    }
}

/// [`Transport`] backed by a `reqwest::Client`.
///
/// Requests JSON output (`alt=json`) unless the caller chose another `alt`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
    max_response_size: usize,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_size(mut self, limit: usize) -> Self {
        self.max_response_size = limit;
        self
    }

    fn request_url(
        &self,
        request: &FeedRequest<'_>,
        credentials: &Credentials,
    ) -> Result<Url, FetchError> {
        let mut url = Url::parse(request.url).map_err(|source| FetchError::InvalidUrl {
            url: request.url.to_owned(),
            source,
        })?;

        let pairs = request.query.to_pairs();
        let has_alt = pairs.iter().any(|(name, _)| *name == "alt");
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
            if !has_alt {
                query.append_pair("alt", "json");
            }
            if let Credentials::ApiKey(key) = credentials {
                query.append_pair("key", key.expose_secret());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        request: &FeedRequest<'_>,
        credentials: &Credentials,
    ) -> Result<Value, FetchError> {
        let url = self.request_url(request, credentials)?;
        tracing::debug!(url = %request.url, "Fetching feed");

        let mut builder = self.client.get(url);
        if let Credentials::Bearer(token) = credentials {
            builder = builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            tracing::debug!(url = %request.url, status = %response.status(), "Feed request failed");
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, self.max_response_size).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
