//! HTTP client for the certificate issuance service.
//!
//! This crate provides [`IssuanceClient`], the network-backed
//! [`CertificateIssuer`](certdial_core::CertificateIssuer).

mod client;
mod config;
pub mod api;

pub use client::{IssuanceClient, IssuanceClientBuilder};
pub use config::*;
pub use certdial_core::{IssuanceError, Result};
