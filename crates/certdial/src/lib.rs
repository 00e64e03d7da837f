//! Ephemeral-certificate TLS bootstrap for dynamically-addressed databases.
//!
//! Given an organization, database and branch, [`bootstrap`] asks an issuance
//! service for a short-lived client certificate, checks it against the local
//! key, and returns the address to dial plus a ready rustls client config.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use certdial::{bootstrap, BootstrapContext, EphemeralKey, Identity, IssuanceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let issuer = IssuanceClient::new(std::env::var("CERTDIAL_TOKEN")?)?;
//!     let identity = Identity::new("planetscale", "mydb", "main")?;
//!     let key = EphemeralKey::generate()?;
//!
//!     let params = bootstrap(&BootstrapContext::new(), &identity, &key, &issuer).await?;
//!     println!("dial {} as {}", params.address(), params.tls().server_name());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Trust model
//!
//! The produced config does not validate the server's chain against any trust
//! store; see [`EphemeralCaVerifier`] for why, and
//! [`TlsConfig::server_identity_matches`] for the check the connecting side
//! should make.
//!
//! # Features
//!
//! - `default` - Uses rustls for the issuance client's HTTPS
//! - `rustls` - Use rustls for the issuance client (recommended)
//! - `native-tls` - Use system native TLS for the issuance client

mod addr;
mod bootstrap;
mod error;
mod key;
mod parse;
pub mod tls;

#[cfg(test)]
mod test_support;

pub use addr::join_host_port;
pub use bootstrap::{bootstrap, BootstrapContext, Bootstrapper, DialParams};
pub use error::{Artifact, DialError, Result};
pub use key::{EphemeralKey, KeyAlgorithm};
pub use parse::{parse_ca_certificate, parse_client_certificate, ClientIdentity, TrustRoot};
pub use tls::{EphemeralCaVerifier, TlsConfig};

// Re-export core types
pub use certdial_core::{
    CertificateBundle, CertificateIssuer, Identity, IdentityError, IssuanceError,
    IssuanceRequest, RemotePorts,
};

// Re-export client
pub use certdial_client::{IssuanceClient, IssuanceClientBuilder, IssuerConfig, RetryConfig};

// Re-export runtime pieces callers need
pub use rustls;
pub use tokio_util::sync::CancellationToken;
