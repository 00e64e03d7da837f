use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ports advertised by the issuance service, keyed by protocol name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePorts(BTreeMap<String, u16>);

impl RemotePorts {
    /// Protocol key for the MySQL wire protocol
    pub const MYSQL: &'static str = "mysql";

    /// Create an empty port map
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace the port for a protocol
    #[must_use]
    pub fn with(mut self, protocol: impl Into<String>, port: u16) -> Self {
        self.insert(protocol, port);
        self
    }

    /// Add or replace the port for a protocol
    pub fn insert(&mut self, protocol: impl Into<String>, port: u16) -> Option<u16> {
        self.0.insert(protocol.into(), port)
    }

    /// Look up the port for a protocol.
    ///
    /// Protocol names are compared ASCII case-insensitively, so `MySQL` and
    /// `mysql` name the same entry.
    #[must_use]
    pub fn get(&self, protocol: &str) -> Option<u16> {
        self.0.get(protocol).copied().or_else(|| {
            self.0
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(protocol))
                .map(|(_, port)| *port)
        })
    }

    /// Port for the MySQL wire protocol, if advertised
    #[must_use]
    pub fn mysql(&self) -> Option<u16> {
        self.get(Self::MYSQL)
    }

    /// Advertised protocol names
    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns true if no ports were advertised
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u16)> for RemotePorts {
    fn from_iter<I: IntoIterator<Item = (S, u16)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
