use thiserror::Error;

/// Result type alias for issuance operations
pub type Result<T> = std::result::Result<T, IssuanceError>;

/// Errors surfaced by a certificate issuance service
#[derive(Error, Debug)]
pub enum IssuanceError {
    /// Authentication failed - invalid or missing access token
    #[error("authentication failed: invalid access token")]
    Unauthorized,

    /// The token is valid but may not issue certificates for this target
    #[error("not authorized to issue certificates: {0}")]
    Forbidden(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Organization, database or branch not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Service returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the service
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl IssuanceError {
    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Connection(_)
        )
    }

    /// Returns true if the error is due to authentication or authorization
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden(_))
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors raised while constructing an [`Identity`](crate::Identity)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// One of organization, database or branch was empty
    #[error("identity component `{field}` must not be empty")]
    EmptyComponent {
        /// Name of the empty component
        field: &'static str,
    },
}
