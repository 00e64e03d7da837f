//! Logical database identity.

use crate::error::IdentityError;

/// The (organization, database, branch) triple naming a database target.
///
/// Immutable once constructed. The identity, together with the remote address
/// handed back by the issuance service, determines the TLS server name used
/// for routing and for the server identity check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    organization: String,
    database: String,
    branch: String,
}

impl Identity {
    /// Create an identity, rejecting empty components.
    ///
    /// Components are otherwise taken as given. Names containing `.` are
    /// assumed to have been rejected upstream: `("o", "d.x", "b")` and
    /// `("o", "x", "b.d")` derive the same [`server_name`](Self::server_name).
    pub fn new(
        organization: impl Into<String>,
        database: impl Into<String>,
        branch: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let identity = Self {
            organization: organization.into(),
            database: database.into(),
            branch: branch.into(),
        };

        for (field, value) in [
            ("organization", &identity.organization),
            ("database", &identity.database),
            ("branch", &identity.branch),
        ] {
            if value.is_empty() {
                return Err(IdentityError::EmptyComponent { field });
            }
        }

        Ok(identity)
    }

    /// Organization name
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Database name
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Branch name
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Derive the TLS server name for this identity behind `remote_addr`.
    ///
    /// The result is `branch.database.organization.remote_addr`, nothing more.
    #[must_use]
    pub fn server_name(&self, remote_addr: &str) -> String {
        format!(
            "{}.{}.{}.{}",
            self.branch, self.database, self.organization, remote_addr
        )
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.organization, self.database, self.branch)
    }
}
