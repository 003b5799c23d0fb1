//! Resolution of GitHub repository URLs to downloadable release assets.
//!
//! - [`AssetResolver`] - Async trait implemented by release sources
//! - [`GithubResolver`] - Latest-release lookup through the GitHub REST API
//! - [`AssetSelection`] - Which asset of a release gets picked
//! - [`resolve_descriptor`] - Turns any [`UrlDescriptor`] into a download URL
//!
//! # Example
//!
//! ```no_run
//! use depfetch_core::parser::classify;
//! use depfetch_core::resolver::{GithubResolver, GithubResolverOptions, resolve_descriptor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = GithubResolver::new(GithubResolverOptions::default())?;
//! let desc = classify("https://github.com/acme/widget")?;
//! let url = resolve_descriptor(&resolver, &desc).await?;
//! println!("Latest asset: {url}");
//! # Ok(())
//! # }
//! ```

mod error;
mod github;
mod http_client;
mod selection;

pub use error::ResolveError;
pub use github::{DEFAULT_API_BASE_URL, GithubResolver, GithubResolverOptions};
pub use http_client::{RESOLVER_CONNECT_TIMEOUT_SECS, RESOLVER_READ_TIMEOUT_SECS};
pub use selection::AssetSelection;

use async_trait::async_trait;
use tracing::debug;

use crate::parser::UrlDescriptor;

/// A release asset picked for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Direct download URL of the asset.
    pub url: String,
    /// Asset name as listed by the release, if any.
    pub name: Option<String>,
    /// Tag of the release the asset belongs to, if any.
    pub tag: Option<String>,
}

/// A source of release assets for repositories.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Resolves the latest release of `owner/repo` to one asset.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] for every lookup failure: transport
    /// errors, non-success status, malformed JSON, no assets, or a selected
    /// asset without a download URL.
    async fn resolve_latest_asset(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<ResolvedAsset, ResolveError>;
}

/// Returns the URL to download for a descriptor.
///
/// Direct descriptors yield their own URL. GitHub descriptors are resolved
/// through `resolver` once; the result is cached on the descriptor and later
/// calls return it without another request.
///
/// # Errors
///
/// Propagates the resolver's error for GitHub descriptors.
#[tracing::instrument(skip_all, fields(url = %descriptor.url(), resolver = resolver.name()))]
pub async fn resolve_descriptor(
    resolver: &dyn AssetResolver,
    descriptor: &UrlDescriptor,
) -> Result<String, ResolveError> {
    let Some((owner, repo)) = descriptor.github_repository() else {
        return Ok(descriptor.url().to_string());
    };

    if let Some(cached) = descriptor.resolved_asset_url() {
        debug!(asset_url = %cached, "using cached release asset URL");
        return Ok(cached.to_string());
    }

    let asset = resolver.resolve_latest_asset(owner, repo).await?;
    descriptor.set_resolved_asset_url(asset.url.clone());
    Ok(descriptor
        .resolved_asset_url()
        .map_or(asset.url, str::to_string))
}
