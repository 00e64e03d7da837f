//! HTTP-backed certificate issuance client.

use crate::api::CertificatesApi;
use crate::config::RetryConfig;
use async_trait::async_trait;
use certdial_core::{
    CertificateBundle, CertificateIssuer, IssuanceError, IssuanceRequest, Result,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// The issuance service base URL
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.planetscale.com";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issuance service client
#[derive(Clone)]
pub struct IssuanceClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    token: String,
    base_url: Url,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for IssuanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .field("retry_config", &self.inner.retry_config)
            .finish_non_exhaustive()
    }
}

impl IssuanceClient {
    /// Create a new client with the given access token using default settings
    pub fn new(token: impl Into<String>) -> Result<Self> {
        IssuanceClientBuilder::new(token).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(token: impl Into<String>) -> IssuanceClientBuilder {
        IssuanceClientBuilder::new(token)
    }

    /// Access certificate endpoints
    #[must_use]
    pub const fn certificates(&self) -> CertificatesApi<'_> {
        CertificatesApi::new(self)
    }

    /// Perform a POST request with JSON body, retrying per the retry config
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = &self.build_url(segments)?;

        self.with_retry(|| async move {
            debug!(url = %url, "POST request");

            let response = self
                .inner
                .http
                .post(url.clone())
                .bearer_auth(&self.inner.token)
                .json(body)
                .send()
                .await
                .map_err(|e| self.transport_error(&e))?;

            self.handle_response(response).await
        })
        .await
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let retry = &self.inner.retry_config;
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retry.should_retry(&e, attempt) => {
                    let backoff = match &e {
                        IssuanceError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs(*secs).min(retry.max_backoff),
                        _ => retry.backoff_for(attempt),
                    };
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        "issuance request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Build an endpoint URL from percent-encoded path segments
    fn build_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                IssuanceError::Config(format!("base URL cannot have a path: {}", self.inner.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Classify a transport-level failure
    fn transport_error(&self, e: &reqwest::Error) -> IssuanceError {
        if e.is_timeout() {
            IssuanceError::Timeout(self.inner.timeout.as_secs())
        } else if e.is_connect() {
            IssuanceError::Connection(e.to_string())
        } else {
            IssuanceError::Http(e.to_string())
        }
    }

    /// Handle a service response that returns JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| self.transport_error(&e))?;
            serde_json::from_str(&body).map_err(IssuanceError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to an `IssuanceError`
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        // Try to parse error message from JSON
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or(body);

        match status {
            401 => Err(IssuanceError::Unauthorized),
            403 => Err(IssuanceError::Forbidden(message)),
            404 => Err(IssuanceError::NotFound { resource: message }),
            429 => {
                warn!(retry_after = ?retry_after, "rate limited by issuance service");
                Err(IssuanceError::RateLimited { retry_after })
            }
            _ => Err(IssuanceError::Api {
                code: status,
                message,
            }),
        }
    }
}

#[async_trait]
impl CertificateIssuer for IssuanceClient {
    async fn create(&self, request: &IssuanceRequest) -> Result<CertificateBundle> {
        self.certificates().create(request).await
    }
}

/// Builder for configuring an [`IssuanceClient`]
pub struct IssuanceClientBuilder {
    token: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    retry_config: RetryConfig,
}

impl IssuanceClientBuilder {
    /// Create a new builder with the given access token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("certdial/{}", env!("CARGO_PKG_VERSION")),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set retry configuration
    #[must_use]
    pub const fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<IssuanceClient> {
        if self.token.is_empty() {
            return Err(IssuanceError::Config("access token must not be empty".into()));
        }

        let base_url = Url::parse(&self.base_url)
            .map_err(|e| IssuanceError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(IssuanceError::Config(format!(
                "base URL cannot have a path: {}",
                self.base_url
            )));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| IssuanceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(IssuanceClient {
            inner: Arc::new(ClientInner {
                http,
                token: self.token,
                base_url,
                timeout: self.timeout,
                retry_config: self.retry_config,
            }),
        })
    }
}
