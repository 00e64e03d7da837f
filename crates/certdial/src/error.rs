use std::time::Duration;

use certdial_core::IssuanceError;
use thiserror::Error;

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, DialError>;

/// The credential artifact a parse failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// The locally held private key
    PrivateKey,
    /// The issued client certificate
    ClientCertificate,
    /// The certificate of the issuing authority
    CaCertificate,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrivateKey => write!(f, "private key"),
            Self::ClientCertificate => write!(f, "client certificate"),
            Self::CaCertificate => write!(f, "CA certificate"),
        }
    }
}

/// Errors that can occur while bootstrapping dial parameters
#[derive(Error, Debug)]
pub enum DialError {
    /// The issuance service failed; passed through unchanged
    #[error("certificate issuance failed: {0}")]
    Issuance(#[from] IssuanceError),

    /// The caller cancelled the bootstrap
    #[error("bootstrap cancelled")]
    Cancelled,

    /// Issuance did not finish before the caller's deadline
    #[error("certificate issuance exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    /// A PEM block or its contents could not be decoded
    #[error("malformed {artifact}: {reason}")]
    MalformedCredential {
        /// Which artifact failed to decode
        artifact: Artifact,
        /// What was wrong with it
        reason: String,
    },

    /// The issued certificate does not carry our public key
    #[error("issued certificate for {subject} does not match the local private key")]
    KeyCertificateMismatch {
        /// Subject of the offending certificate
        subject: String,
    },

    /// The bundle has no port for the requested protocol
    #[error("no port advertised for protocol {protocol} (advertised: {advertised:?})")]
    PortNotAdvertised {
        /// Protocol that was looked up
        protocol: String,
        /// Protocols the service did advertise
        advertised: Vec<String>,
    },

    /// Key generation failed
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// rustls rejected the assembled configuration
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// The computed server name is not usable for SNI
    #[error("invalid server name {name}: {reason}")]
    InvalidServerName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

impl DialError {
    pub(crate) fn malformed(artifact: Artifact, reason: impl std::fmt::Display) -> Self {
        Self::MalformedCredential {
            artifact,
            reason: reason.to_string(),
        }
    }

    /// The artifact named by a `MalformedCredential` error
    #[must_use]
    pub const fn artifact(&self) -> Option<Artifact> {
        match self {
            Self::MalformedCredential { artifact, .. } => Some(*artifact),
            _ => None,
        }
    }

    /// Returns true if the caller stopped the bootstrap
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded(_))
    }
}
