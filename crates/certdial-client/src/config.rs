//! Client configuration types.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use certdial_core::{IssuanceError, Result};

use crate::client::{IssuanceClientBuilder, DEFAULT_BASE_URL};

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV: &str = "CERTDIAL_TOKEN";

/// Retry configuration for failed issuance requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Whether to retry on rate limit errors
    pub retry_on_rate_limit: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_on_rate_limit: true,
        }
    }

    /// A configuration that never retries
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new().max_retries(0)
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set initial backoff duration
    #[must_use]
    pub const fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set maximum backoff duration
    #[must_use]
    pub const fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Set whether rate limited requests are retried
    #[must_use]
    pub const fn retry_on_rate_limit(mut self, retry: bool) -> Self {
        self.retry_on_rate_limit = retry;
        self
    }

    /// Calculate backoff for a given attempt
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let initial = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let backoff = initial.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(backoff.min(max))
    }

    /// Whether `error` should be retried after `attempt` failed attempts
    #[must_use]
    pub const fn should_retry(&self, error: &IssuanceError, attempt: u32) -> bool {
        if attempt >= self.max_retries || !error.is_retryable() {
            return false;
        }
        match error {
            IssuanceError::RateLimited { .. } => self.retry_on_rate_limit,
            _ => true,
        }
    }
}

/// File-based configuration for the issuance client.
///
/// ```toml
/// base_url = "https://api.example.com"
/// token = "pscale_tkn_..."
/// timeout_secs = 30
///
/// [retry]
/// max_retries = 3
/// initial_backoff_ms = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Base URL of the issuance service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token. Falls back to `CERTDIAL_TOKEN` when absent.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Custom User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Retry behavior
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Serializable form of [`RetryConfig`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Whether to retry on rate limit errors
    #[serde(default = "default_true")]
    pub retry_on_rate_limit: bool,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            retry: RetrySettings::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            retry_on_rate_limit: true,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self::new()
            .max_retries(settings.max_retries)
            .initial_backoff(Duration::from_millis(settings.initial_backoff_ms))
            .max_backoff(Duration::from_millis(settings.max_backoff_ms))
            .retry_on_rate_limit(settings.retry_on_rate_limit)
    }
}

impl IssuerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| IssuanceError::Config(format!("{}: {e}", path.display())))?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| IssuanceError::Config(e.to_string()))
    }

    /// Resolve the access token from the config or the environment
    pub fn resolve_token(&self) -> Result<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                IssuanceError::Config(format!("no access token configured (set {TOKEN_ENV})"))
            })
    }

    /// Turn this config into a client builder
    pub fn into_builder(self) -> Result<IssuanceClientBuilder> {
        let token = self.resolve_token()?;
        let mut builder = IssuanceClientBuilder::new(token)
            .base_url(self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .retry(RetryConfig::from(&self.retry));
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        Ok(builder)
    }
}

// Default value functions for serde.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

const fn default_true() -> bool {
    true
}
