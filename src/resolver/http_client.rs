//! Shared HTTP client construction policy for resolvers.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::ResolveError;

/// Default resolver connect timeout (10 seconds).
pub const RESOLVER_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default resolver request timeout (30 seconds).
pub const RESOLVER_READ_TIMEOUT_SECS: u64 = 30;

/// Builds a resolver HTTP client with the project User-Agent and timeouts.
///
/// # Errors
///
/// Returns [`ResolveError::Client`] when client construction fails.
pub(crate) fn build_resolver_http_client(
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
) -> Result<Client, ResolveError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| ResolveError::client(&error.to_string()))
}
