//! Classified representation of one input URL.

use std::fmt;
use std::sync::OnceLock;

/// What a classified URL points at.
///
/// A descriptor is either a GitHub repository (owner and repository known,
/// no file name) or a direct link (maybe with a file name), never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    /// `https://github.com/{owner}/{repo}`: the latest release asset is downloaded.
    GithubRepository {
        /// Repository owner (user or organization).
        owner: String,
        /// Repository name.
        repo: String,
    },
    /// Any other URL, downloaded as-is.
    Direct {
        /// File name inferred from the last path segment, when it has an extension.
        file_name: Option<String>,
    },
}

/// One input URL after classification.
///
/// Immutable once built, apart from the resolved release asset URL which is
/// cached the first time a GitHub descriptor is resolved.
#[derive(Debug, Clone)]
pub struct UrlDescriptor {
    url: String,
    kind: DescriptorKind,
    resolved_asset_url: OnceLock<String>,
}

impl UrlDescriptor {
    /// Creates a GitHub repository descriptor.
    #[must_use]
    pub fn github(url: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: DescriptorKind::GithubRepository {
                owner: owner.into(),
                repo: repo.into(),
            },
            resolved_asset_url: OnceLock::new(),
        }
    }

    /// Creates a direct-link descriptor.
    #[must_use]
    pub fn direct(url: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            url: url.into(),
            kind: DescriptorKind::Direct { file_name },
            resolved_asset_url: OnceLock::new(),
        }
    }

    /// The URL as supplied by the user.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The classification result.
    #[must_use]
    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    /// Returns true for GitHub repository descriptors.
    #[must_use]
    pub fn is_github_repository(&self) -> bool {
        matches!(self.kind, DescriptorKind::GithubRepository { .. })
    }

    /// Returns `(owner, repo)` for GitHub repository descriptors.
    #[must_use]
    pub fn github_repository(&self) -> Option<(&str, &str)> {
        match &self.kind {
            DescriptorKind::GithubRepository { owner, repo } => Some((owner, repo)),
            DescriptorKind::Direct { .. } => None,
        }
    }

    /// File name inferred from a direct URL path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match &self.kind {
            DescriptorKind::Direct { file_name } => file_name.as_deref(),
            DescriptorKind::GithubRepository { .. } => None,
        }
    }

    /// The cached release asset URL, if this descriptor has been resolved.
    #[must_use]
    pub fn resolved_asset_url(&self) -> Option<&str> {
        self.resolved_asset_url.get().map(String::as_str)
    }

    /// Caches the resolved release asset URL.
    ///
    /// Returns false when the descriptor is not a GitHub repository or a URL
    /// was already cached; the first cached value always wins.
    pub fn set_resolved_asset_url(&self, url: impl Into<String>) -> bool {
        if !self.is_github_repository() {
            return false;
        }
        self.resolved_asset_url.set(url.into()).is_ok()
    }

    /// The URL to download: the resolved asset for GitHub descriptors, the
    /// input URL for direct ones. `None` for an unresolved GitHub descriptor.
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        match self.kind {
            DescriptorKind::GithubRepository { .. } => self.resolved_asset_url(),
            DescriptorKind::Direct { .. } => Some(&self.url),
        }
    }
}

impl fmt::Display for UrlDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[gh: {}][fname: {}] {}",
            self.is_github_repository(),
            self.file_name().unwrap_or("-"),
            self.url
        )
    }
}
