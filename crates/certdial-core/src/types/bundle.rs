use serde::{Deserialize, Serialize};

use super::RemotePorts;

/// Artifacts returned by one issuance call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateBundle {
    /// PEM-encoded client certificate, leaf first
    #[serde(rename = "certificate")]
    pub client_certificate: String,

    /// PEM-encoded certificate of the issuing authority
    #[serde(rename = "certificate_chain")]
    pub ca_certificate: String,

    /// Host name or IP literal of the database endpoint
    pub remote_addr: String,

    /// Ports by protocol name
    #[serde(default)]
    pub ports: RemotePorts,
}
