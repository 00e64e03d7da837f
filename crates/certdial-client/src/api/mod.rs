//! API endpoint modules.

mod certificates;

pub use certificates::CertificatesApi;
