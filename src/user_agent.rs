//! Shared User-Agent string for download and resolver HTTP clients.
//!
//! GitHub rejects API requests without a User-Agent, so every client built by
//! this crate sends the same identifying string.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/depfetch";

/// Default User-Agent for all outbound requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("depfetch/{version} (dependency-fetcher; +{PROJECT_UA_URL})")
}
