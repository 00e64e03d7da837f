//! Shared fixtures for integration tests.

#[allow(dead_code)]
#[path = "../../src/test_support.rs"]
mod test_support;

pub(crate) use test_support::Authority;
