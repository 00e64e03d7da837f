//! Client TLS configuration assembly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::{CertificateDer, ServerName};
use x509_parser::extensions::GeneralName;

use crate::error::{DialError, Result};
use crate::key::EphemeralKey;
use crate::parse::{ClientIdentity, TrustRoot};
use crate::tls::EphemeralCaVerifier;

/// TLS settings for one dial, built from one issuance.
///
/// Holds exactly one root (the issued CA), exactly one client certificate
/// chain, and the server name derived from the identity. Standard peer chain
/// verification is bypassed (see
/// [`skip_peer_chain_verification`](Self::skip_peer_chain_verification)), so
/// the root store is not consulted during the handshake.
#[derive(Clone)]
pub struct TlsConfig {
    client_config: Arc<ClientConfig>,
    root_store: Arc<RootCertStore>,
    ca_certificate: CertificateDer<'static>,
    client_chain: Vec<CertificateDer<'static>>,
    client_subject: String,
    client_not_after: DateTime<Utc>,
    server_name: String,
    skip_peer_chain_verification: bool,
}

impl TlsConfig {
    /// Assemble the rustls client config.
    ///
    /// `client` must already be paired with `key`.
    pub(crate) fn build(
        client: ClientIdentity,
        key: &EphemeralKey,
        root: TrustRoot,
        server_name: String,
    ) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = Arc::new(EphemeralCaVerifier::new(&provider));

        let client_config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| DialError::Tls(format!("TLS version config: {e}")))?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_client_auth_cert(client.chain().to_vec(), key.private_key_der())
            .map_err(|e| match e {
                rustls::Error::InconsistentKeys(_) => DialError::KeyCertificateMismatch {
                    subject: client.subject().to_string(),
                },
                other => DialError::Tls(format!("client cert config: {other}")),
            })?;

        Ok(Self {
            client_config: Arc::new(client_config),
            root_store: Arc::new(root.store().clone()),
            ca_certificate: root.certificate().clone(),
            client_chain: client.chain().to_vec(),
            client_subject: client.subject().to_string(),
            client_not_after: client.not_after(),
            server_name,
            skip_peer_chain_verification: true,
        })
    }

    /// The ready-to-use rustls client configuration.
    #[must_use]
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.client_config)
    }

    /// Root store holding exactly the issued CA certificate.
    ///
    /// Informational only. The [`client_config`](Self::client_config)
    /// verifier never checks the server's chain against it; callers wanting
    /// chain validation must build their own verifier from this store.
    #[must_use]
    pub fn root_store(&self) -> &RootCertStore {
        &self.root_store
    }

    /// DER of the issued CA certificate.
    #[must_use]
    pub const fn ca_certificate(&self) -> &CertificateDer<'static> {
        &self.ca_certificate
    }

    /// The single client certificate chain presented to the server, leaf first.
    #[must_use]
    pub fn client_chain(&self) -> &[CertificateDer<'static>] {
        &self.client_chain
    }

    /// Subject of the client certificate.
    #[must_use]
    pub fn client_subject(&self) -> &str {
        &self.client_subject
    }

    /// When the client certificate expires.
    #[must_use]
    pub const fn client_not_after(&self) -> DateTime<Utc> {
        self.client_not_after
    }

    /// Server name sent via SNI and expected in the server's certificate.
    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Always true for configurations produced by bootstrap.
    ///
    /// The server's chain is not validated against any trust store. The
    /// connection-opening side is expected to compare the server's
    /// certificate against [`server_name`](Self::server_name), for example
    /// with [`server_identity_matches`](Self::server_identity_matches).
    #[must_use]
    pub const fn skip_peer_chain_verification(&self) -> bool {
        self.skip_peer_chain_verification
    }

    /// The server name as a rustls `ServerName`.
    pub fn rustls_server_name(&self) -> Result<ServerName<'static>> {
        ServerName::try_from(self.server_name.clone()).map_err(|e| DialError::InvalidServerName {
            name: self.server_name.clone(),
            reason: e.to_string(),
        })
    }

    /// Whether a server certificate names our server name.
    ///
    /// Compares the subject common name and DNS subject alternative names,
    /// ignoring ASCII case. Unparseable certificates never match.
    #[must_use]
    pub fn server_identity_matches(&self, end_entity: &CertificateDer<'_>) -> bool {
        let Ok((_, cert)) = x509_parser::parse_x509_certificate(end_entity) else {
            return false;
        };

        let cn_matches = cert
            .subject()
            .iter_common_name()
            .filter_map(|cn| cn.as_str().ok())
            .any(|cn| cn.eq_ignore_ascii_case(&self.server_name));

        let san_matches = cert
            .subject_alternative_name()
            .ok()
            .flatten()
            .is_some_and(|san| {
                san.value.general_names.iter().any(|name| {
                    matches!(name, GeneralName::DNSName(dns) if dns.eq_ignore_ascii_case(&self.server_name))
                })
            });

        cn_matches || san_matches
    }
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("server_name", &self.server_name)
            .field("client_subject", &self.client_subject)
            .field("client_not_after", &self.client_not_after)
            .field("client_chain_len", &self.client_chain.len())
            .field("roots", &self.root_store.len())
            .field("skip_peer_chain_verification", &self.skip_peer_chain_verification)
            .finish_non_exhaustive()
    }
}
