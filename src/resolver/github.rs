//! GitHub resolver - turns `owner/repo` into the download URL of a release asset.
//!
//! The [`GithubResolver`] queries `GET /repos/{owner}/{repo}/releases/latest`
//! and picks one asset from the response according to an [`AssetSelection`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::http_client::{
    RESOLVER_CONNECT_TIMEOUT_SECS, RESOLVER_READ_TIMEOUT_SECS, build_resolver_http_client,
};
use super::{AssetResolver, AssetSelection, ResolveError, ResolvedAsset};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

// ==================== GitHub API Response Types ====================

/// Subset of the `releases/latest` response we read.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestRelease {
    pub tag_name: Option<String>,
    pub assets: Option<Vec<ReleaseAsset>>,
}

/// One entry of a release's `assets` array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReleaseAsset {
    pub name: Option<String>,
    pub browser_download_url: Option<String>,
}

impl ReleaseAsset {
    /// The asset name, or the last segment of its download URL when unnamed.
    pub(crate) fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty()).or_else(|| {
            self.browser_download_url
                .as_deref()
                .and_then(|url| url.rsplit('/').find(|segment| !segment.is_empty()))
        })
    }
}

// ==================== GithubResolver ====================

/// Options for [`GithubResolver`].
#[derive(Debug, Clone)]
pub struct GithubResolverOptions {
    /// Which asset of the latest release to pick.
    pub selection: AssetSelection,
    /// Optional token sent as `Authorization: Bearer`.
    pub token: Option<String>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for GithubResolverOptions {
    fn default() -> Self {
        Self {
            selection: AssetSelection::default(),
            token: None,
            connect_timeout_secs: RESOLVER_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: RESOLVER_READ_TIMEOUT_SECS,
        }
    }
}

/// Resolves GitHub repositories to the download URL of a latest-release asset.
///
/// Unauthenticated requests are limited to 60 per hour by GitHub; pass a
/// token in [`GithubResolverOptions::token`] when fetching many repositories.
pub struct GithubResolver {
    client: Client,
    base_url: String,
    selection: AssetSelection,
    token: Option<String>,
}

impl GithubResolver {
    /// Creates a resolver against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Client`] if HTTP client construction fails.
    pub fn new(options: GithubResolverOptions) -> Result<Self, ResolveError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, options)
    }

    /// Creates a resolver with a custom API base URL (GitHub Enterprise, or
    /// wiremock in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Client`] if HTTP client construction fails.
    #[tracing::instrument(skip_all, fields(base_url))]
    pub fn with_base_url(
        base_url: impl Into<String>,
        options: GithubResolverOptions,
    ) -> Result<Self, ResolveError> {
        let client =
            build_resolver_http_client(options.connect_timeout_secs, options.read_timeout_secs)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::Span::current().record("base_url", base_url.as_str());

        Ok(Self {
            client,
            base_url,
            selection: options.selection,
            token: options.token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn latest_release_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        )
    }

    async fn fetch_latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<LatestRelease, ResolveError> {
        let url = self.latest_release_url(owner, repo);
        debug!(%url, "querying latest release");

        let mut request = self.client.get(&url).header(ACCEPT, GITHUB_JSON_MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|error| {
            ResolveError::not_found_with_suggestion(
                owner,
                repo,
                &format!("request failed: {error}"),
                "Check your network connection and that the GitHub API is reachable",
            )
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let suggestion = match status.as_u16() {
                404 => "Check that the repository exists and has a published (non-draft) release",
                403 | 429 => "GitHub rate limit reached; set GITHUB_TOKEN or wait before retrying",
                _ => "Retry later; GitHub may be having trouble",
            };
            return Err(ResolveError::not_found_with_suggestion(
                owner,
                repo,
                &format!("GitHub API returned HTTP {}", status.as_u16()),
                suggestion,
            ));
        }

        response.json::<LatestRelease>().await.map_err(|error| {
            ResolveError::not_found(owner, repo, &format!("unexpected release JSON: {error}"))
        })
    }
}

impl std::fmt::Debug for GithubResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubResolver")
            .field("base_url", &self.base_url)
            .field("selection", &self.selection)
            .field("has_token", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AssetResolver for GithubResolver {
    fn name(&self) -> &'static str {
        "github"
    }

    #[tracing::instrument(skip(self), fields(resolver = "github"))]
    async fn resolve_latest_asset(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<ResolvedAsset, ResolveError> {
        let release = self.fetch_latest_release(owner, repo).await?;

        let assets = release.assets.unwrap_or_default();
        if assets.is_empty() {
            warn!(%owner, %repo, "latest release has no assets");
            return Err(ResolveError::not_found(
                owner,
                repo,
                "latest release has no assets",
            ));
        }

        let Some(asset) = self.selection.select(&assets) else {
            return Err(ResolveError::not_found_with_suggestion(
                owner,
                repo,
                &format!(
                    "no asset matches selection {} among {} asset(s)",
                    self.selection,
                    assets.len()
                ),
                "Adjust --asset-pattern or --asset-index",
            ));
        };

        let Some(url) = asset
            .browser_download_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        else {
            return Err(ResolveError::not_found(
                owner,
                repo,
                "selected asset has no browser_download_url",
            ));
        };

        info!(%owner, %repo, asset_url = %url, "resolved latest release asset");
        Ok(ResolvedAsset {
            url: url.to_string(),
            name: asset.name.clone(),
            tag: release.tag_name,
        })
    }
}
