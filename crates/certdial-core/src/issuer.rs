//! The certificate issuance capability.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{CertificateBundle, IssuanceRequest, Result};

/// Exchanges an identity and public key for a signed certificate bundle.
///
/// Implementations surface transport, authentication and authorization
/// failures as [`IssuanceError`](crate::IssuanceError). Callers of this trait
/// do not retry; an implementation that wants retries does them internally.
#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// Issue a client certificate for `request`.
    async fn create(&self, request: &IssuanceRequest) -> Result<CertificateBundle>;
}

#[async_trait]
impl<T: CertificateIssuer + ?Sized> CertificateIssuer for Arc<T> {
    async fn create(&self, request: &IssuanceRequest) -> Result<CertificateBundle> {
        (**self).create(request).await
    }
}

#[async_trait]
impl<'a, T: CertificateIssuer + ?Sized> CertificateIssuer for &'a T {
    async fn create(&self, request: &IssuanceRequest) -> Result<CertificateBundle> {
        (**self).create(request).await
    }
}
