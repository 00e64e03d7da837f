//! Certificate issuance endpoints.

use crate::IssuanceClient;
use certdial_core::{CertificateBundle, IssuanceRequest, Result};
use serde::Serialize;
use tracing::debug;

/// PEM tag for SubjectPublicKeyInfo
const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

/// Certificate API endpoints
pub struct CertificatesApi<'a> {
    client: &'a IssuanceClient,
}

#[derive(Serialize)]
struct CreateCertificateBody {
    public_key: String,
}

impl<'a> CertificatesApi<'a> {
    pub(crate) const fn new(client: &'a IssuanceClient) -> Self {
        Self { client }
    }

    /// Issue a client certificate for a branch.
    ///
    /// The public key is sent PEM-encoded; the private half never leaves
    /// the caller.
    pub async fn create(&self, request: &IssuanceRequest) -> Result<CertificateBundle> {
        debug!(
            organization = %request.organization,
            database = %request.database,
            branch = %request.branch,
            "requesting client certificate"
        );

        let body = CreateCertificateBody {
            public_key: pem::encode(&pem::Pem::new(PUBLIC_KEY_TAG, request.public_key.clone())),
        };

        self.client
            .post(
                &[
                    "v1",
                    "organizations",
                    &request.organization,
                    "databases",
                    &request.database,
                    "branches",
                    &request.branch,
                    "certificates",
                ],
                &body,
            )
            .await
    }
}
