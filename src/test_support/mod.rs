//! Shared helpers for unit tests.

pub mod socket_guard;
pub mod zip_fixture;
