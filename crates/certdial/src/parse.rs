//! Certificate bundle parsing.
//!
//! Turns the PEM text returned by the issuance service into DER structures
//! rustls accepts, checking along the way that every block really is an X.509
//! certificate and that the client certificate carries our public key.

use chrono::{DateTime, TimeZone, Utc};
use rustls::RootCertStore;
use rustls_pki_types::CertificateDer;
use tracing::debug;
use x509_parser::certificate::X509Certificate;

use crate::error::{Artifact, DialError, Result};
use crate::key::EphemeralKey;

/// PEM tag for X.509 certificates
const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// The issued client certificate, paired with the key that requested it.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    chain: Vec<CertificateDer<'static>>,
    subject: String,
    not_after: DateTime<Utc>,
}

impl ClientIdentity {
    /// Certificate chain, leaf first.
    #[must_use]
    pub fn chain(&self) -> &[CertificateDer<'static>] {
        &self.chain
    }

    /// Subject common name of the leaf (or the full subject if it has none).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Expiry of the leaf certificate.
    #[must_use]
    pub const fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }
}

/// The single certificate authority trusted for one bootstrap call.
#[derive(Debug, Clone)]
pub struct TrustRoot {
    store: RootCertStore,
    certificate: CertificateDer<'static>,
    subject: String,
}

impl TrustRoot {
    /// Root store holding exactly the CA certificate.
    #[must_use]
    pub const fn store(&self) -> &RootCertStore {
        &self.store
    }

    /// DER of the CA certificate.
    #[must_use]
    pub const fn certificate(&self) -> &CertificateDer<'static> {
        &self.certificate
    }

    /// Subject of the CA certificate.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Parse the issued client certificate and pair it with `key`.
///
/// The first `CERTIFICATE` block is the leaf; any further blocks are carried
/// along as intermediates.
pub fn parse_client_certificate(key: &EphemeralKey, pem_text: &str) -> Result<ClientIdentity> {
    let ders = decode_certificates(pem_text, Artifact::ClientCertificate)?;

    let (subject, not_after) = {
        let leaf = parse_der(&ders[0], Artifact::ClientCertificate)?;
        let subject = subject_name(&leaf);
        if leaf.public_key().subject_public_key.data.as_ref() != key.public_key_raw() {
            return Err(DialError::KeyCertificateMismatch { subject });
        }
        (subject, asn1_to_utc(leaf.validity().not_after))
    };

    for der in &ders[1..] {
        parse_der(der, Artifact::ClientCertificate)?;
    }

    debug!(subject = %subject, chain_len = ders.len(), not_after = %not_after, "parsed client certificate");

    Ok(ClientIdentity {
        chain: ders.into_iter().map(CertificateDer::from).collect(),
        subject,
        not_after,
    })
}

/// Parse the CA certificate into a single-entry root store.
///
/// Exactly one `CERTIFICATE` block is accepted.
pub fn parse_ca_certificate(pem_text: &str) -> Result<TrustRoot> {
    let mut ders = decode_certificates(pem_text, Artifact::CaCertificate)?;
    if ders.len() != 1 {
        return Err(DialError::malformed(
            Artifact::CaCertificate,
            format!("expected exactly one certificate, found {}", ders.len()),
        ));
    }
    let der = ders.remove(0);

    let subject = subject_name(&parse_der(&der, Artifact::CaCertificate)?);

    let certificate = CertificateDer::from(der);
    let mut store = RootCertStore::empty();
    store
        .add(certificate.clone())
        .map_err(|e| DialError::malformed(Artifact::CaCertificate, e))?;

    debug!(subject = %subject, "parsed CA certificate");

    Ok(TrustRoot {
        store,
        certificate,
        subject,
    })
}

/// Decode all PEM blocks, requiring at least one and only `CERTIFICATE` tags.
fn decode_certificates(pem_text: &str, artifact: Artifact) -> Result<Vec<Vec<u8>>> {
    let blocks = pem::parse_many(pem_text).map_err(|e| DialError::malformed(artifact, e))?;

    if blocks.is_empty() {
        return Err(DialError::malformed(artifact, "no PEM block found"));
    }

    blocks
        .into_iter()
        .map(|block| {
            if block.tag() == CERTIFICATE_TAG {
                Ok(block.into_contents())
            } else {
                Err(DialError::malformed(
                    artifact,
                    format!("unexpected PEM block {:?}", block.tag()),
                ))
            }
        })
        .collect()
}

/// Parse one DER certificate, rejecting trailing bytes.
fn parse_der(der: &[u8], artifact: Artifact) -> Result<X509Certificate<'_>> {
    let (rest, cert) =
        x509_parser::parse_x509_certificate(der).map_err(|e| DialError::malformed(artifact, e))?;
    if !rest.is_empty() {
        return Err(DialError::malformed(
            artifact,
            format!("{} trailing bytes after certificate", rest.len()),
        ));
    }
    Ok(cert)
}

fn subject_name(cert: &X509Certificate<'_>) -> String {
    cert.subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map_or_else(|| cert.subject().to_string(), String::from)
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> DateTime<Utc> {
    Utc.timestamp_opt(t.timestamp(), 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
