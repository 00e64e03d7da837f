//! Core types and traits for ephemeral-certificate TLS bootstrap.
//!
//! This crate provides the foundational types shared by the issuance client
//! and the bootstrap orchestrator:
//!
//! - **Identity**: the (organization, database, branch) triple, see [`Identity`]
//! - **Types**: issuance requests, certificate bundles and advertised ports
//! - **Issuer**: the [`CertificateIssuer`] capability
//! - **Errors**: [`IssuanceError`] and [`IdentityError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use certdial_core::{CertificateIssuer, Identity, IssuanceRequest};
//!
//! async fn issue(issuer: &dyn CertificateIssuer, spki: Vec<u8>) -> certdial_core::Result<()> {
//!     let identity = Identity::new("planetscale", "mydb", "main").unwrap();
//!     let bundle = issuer.create(&IssuanceRequest::new(&identity, spki)).await?;
//!     println!("server name: {}", identity.server_name(&bundle.remote_addr));
//!     Ok(())
//! }
//! ```

mod error;
mod identity;
mod issuer;
pub mod types;

pub use error::{IdentityError, IssuanceError, Result};
pub use identity::Identity;
pub use issuer::CertificateIssuer;
pub use types::*;
