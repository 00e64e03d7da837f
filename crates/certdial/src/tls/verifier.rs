//! Server certificate verification for issuance-anchored connections.
//!
//! The remote address handed out by the issuance service is ephemeral and
//! load-balanced. It has no stable public hostname, so neither the system
//! trust store nor ordinary hostname verification can vouch for it.
//!
//! This verifier skips chain validation entirely. It does not consult the
//! issued CA either; the CA is only carried on [`TlsConfig::root_store`] for
//! callers that check it themselves. The remaining server identity check is
//! the name comparison the connection-opening side makes with
//! [`TlsConfig::server_identity_matches`]. Handshake signatures are still
//! checked, so the peer must hold the private key of the certificate it
//! presents.
//!
//! [`TlsConfig::server_identity_matches`]: super::TlsConfig::server_identity_matches
//! [`TlsConfig::root_store`]: super::TlsConfig::root_store

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::WebPkiSupportedAlgorithms;
use rustls::{DigitallySignedStruct, Error as TlsError, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use tracing::debug;

/// Accepts any server certificate chain, including ones the issued CA did
/// not sign; verifies handshake signatures.
#[derive(Debug)]
pub struct EphemeralCaVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl EphemeralCaVerifier {
    /// Build a verifier using the signature algorithms of `provider`.
    #[must_use]
    pub fn new(provider: &Arc<rustls::crypto::CryptoProvider>) -> Self {
        Self {
            algorithms: provider.signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for EphemeralCaVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        debug!(server_name = ?server_name, "skipping server chain verification");
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}
