use crate::Identity;

/// A request for a client certificate scoped to one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceRequest {
    /// Organization name
    pub organization: String,

    /// Database name
    pub database: String,

    /// Branch name
    pub branch: String,

    /// Public half of the caller's key, as SubjectPublicKeyInfo DER
    pub public_key: Vec<u8>,
}

impl IssuanceRequest {
    /// Build a request for `identity` carrying `public_key`
    #[must_use]
    pub fn new(identity: &Identity, public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            organization: identity.organization().to_string(),
            database: identity.database().to_string(),
            branch: identity.branch().to_string(),
            public_key: public_key.into(),
        }
    }
}
