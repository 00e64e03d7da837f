//! Dial address formatting.

/// Join a host and port into `host:port`.
///
/// IPv6 literals are bracketed (`[::1]:3306`). A host that is already
/// bracketed is left alone.
#[must_use]
pub fn join_host_port(host: &str, port: u16) -> String {
    let bracketed = host.starts_with('[') && host.ends_with(']');
    if host.contains(':') && !bracketed {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
