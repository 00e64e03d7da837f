//! The bootstrap orchestrator.
//!
//! One call runs one full cycle: request a certificate for an identity,
//! parse what comes back, and assemble a dial address plus TLS configuration.
//! Nothing is retained between calls; renewing means calling again with a
//! fresh key.

use std::time::Duration;

use certdial_core::{
    CertificateBundle, CertificateIssuer, Identity, IssuanceRequest, RemotePorts,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::addr::join_host_port;
use crate::error::{DialError, Result};
use crate::key::{EphemeralKey, KeyAlgorithm};
use crate::parse::{parse_ca_certificate, parse_client_certificate};
use crate::tls::TlsConfig;

/// Cancellation and deadline for one bootstrap call.
#[derive(Debug, Clone, Default)]
pub struct BootstrapContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl BootstrapContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the bootstrap when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Give up on issuance after `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The token this context listens on.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The issuance deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Everything needed to open a connection: where, and how.
#[derive(Debug, Clone)]
pub struct DialParams {
    address: String,
    tls: TlsConfig,
}

impl DialParams {
    /// `host:port` to connect to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// TLS settings for the connection.
    #[must_use]
    pub const fn tls(&self) -> &TlsConfig {
        &self.tls
    }

    /// Split into address and TLS settings.
    #[must_use]
    pub fn into_parts(self) -> (String, TlsConfig) {
        (self.address, self.tls)
    }
}

/// Configured bootstrap orchestrator.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    protocol: String,
    key_algorithm: KeyAlgorithm,
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self {
            protocol: RemotePorts::MYSQL.to_string(),
            key_algorithm: KeyAlgorithm::default(),
        }
    }
}

impl Bootstrapper {
    /// An orchestrator dialing the MySQL protocol port.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dial the port advertised for `protocol` instead.
    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Algorithm used by [`bootstrap_fresh`](Self::bootstrap_fresh).
    #[must_use]
    pub const fn key_algorithm(mut self, algorithm: KeyAlgorithm) -> Self {
        self.key_algorithm = algorithm;
        self
    }

    /// Obtain a certificate for `identity` and assemble dial parameters.
    ///
    /// Issuer failures are returned unchanged inside [`DialError::Issuance`].
    /// Nothing is returned unless every step succeeds.
    pub async fn bootstrap<I>(
        &self,
        ctx: &BootstrapContext,
        identity: &Identity,
        key: &EphemeralKey,
        issuer: &I,
    ) -> Result<DialParams>
    where
        I: CertificateIssuer + ?Sized,
    {
        let request = IssuanceRequest::new(identity, key.public_key_der());
        debug!(
            organization = identity.organization(),
            database = identity.database(),
            branch = identity.branch(),
            "bootstrapping dial parameters"
        );

        let bundle = issue(ctx, issuer, &request).await?;
        self.assemble(identity, key, bundle)
    }

    /// Like [`bootstrap`](Self::bootstrap), with a key generated for this call.
    pub async fn bootstrap_fresh<I>(
        &self,
        ctx: &BootstrapContext,
        identity: &Identity,
        issuer: &I,
    ) -> Result<DialParams>
    where
        I: CertificateIssuer + ?Sized,
    {
        let key = EphemeralKey::generate_with(self.key_algorithm)?;
        self.bootstrap(ctx, identity, &key, issuer).await
    }

    /// Turn an issued bundle into dial parameters.
    fn assemble(
        &self,
        identity: &Identity,
        key: &EphemeralKey,
        bundle: CertificateBundle,
    ) -> Result<DialParams> {
        let client = parse_client_certificate(key, &bundle.client_certificate)?;
        let root = parse_ca_certificate(&bundle.ca_certificate)?;

        let server_name = identity.server_name(&bundle.remote_addr);

        let port = bundle
            .ports
            .get(&self.protocol)
            .ok_or_else(|| DialError::PortNotAdvertised {
                protocol: self.protocol.clone(),
                advertised: bundle.ports.protocols().map(String::from).collect(),
            })?;
        let address = join_host_port(&bundle.remote_addr, port);

        let tls = TlsConfig::build(client, key, root, server_name)?;

        debug!(
            remote_addr = %bundle.remote_addr,
            port,
            server_name = tls.server_name(),
            "dial parameters ready"
        );

        Ok(DialParams { address, tls })
    }
}

/// Obtain a certificate for `identity` and assemble dial parameters for the
/// MySQL protocol port.
pub async fn bootstrap<I>(
    ctx: &BootstrapContext,
    identity: &Identity,
    key: &EphemeralKey,
    issuer: &I,
) -> Result<DialParams>
where
    I: CertificateIssuer + ?Sized,
{
    Bootstrapper::new().bootstrap(ctx, identity, key, issuer).await
}

/// Run the issuer, racing cancellation and the deadline.
async fn issue<I>(
    ctx: &BootstrapContext,
    issuer: &I,
    request: &IssuanceRequest,
) -> Result<CertificateBundle>
where
    I: CertificateIssuer + ?Sized,
{
    tokio::select! {
        biased;
        () = ctx.cancel.cancelled() => {
            debug!("bootstrap cancelled during issuance");
            Err(DialError::Cancelled)
        }
        result = issue_with_deadline(ctx.timeout, issuer, request) => result,
    }
}

async fn issue_with_deadline<I>(
    timeout: Option<Duration>,
    issuer: &I,
    request: &IssuanceRequest,
) -> Result<CertificateBundle>
where
    I: CertificateIssuer + ?Sized,
{
    let issued = match timeout {
        Some(limit) => tokio::time::timeout(limit, issuer.create(request))
            .await
            .map_err(|_| DialError::DeadlineExceeded(limit))?,
        None => issuer.create(request).await,
    };
    issued.map_err(DialError::from)
}
