//! TLS configuration for dialing an ephemeral database endpoint.
//!
//! - [`TlsConfig`]: the assembled client configuration plus the parts it was
//!   built from
//! - [`EphemeralCaVerifier`]: the server certificate verifier that replaces
//!   chain validation (see its docs before touching it)

mod config;
mod verifier;

pub use config::TlsConfig;
pub use verifier::EphemeralCaVerifier;
