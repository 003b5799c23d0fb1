//! Error types for release asset resolution.
//!
//! Follows the What/Why/Fix pattern used across the project.

use thiserror::Error;

/// Errors that can occur while resolving a GitHub repository to a release asset.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The latest release could not be turned into a downloadable asset URL.
    ///
    /// Bad status, unexpected JSON, missing or empty `assets`, and an asset
    /// without `browser_download_url` all end up here; `reason` tells them apart
    /// in logs.
    #[error("no release asset found for {owner}/{repo}: {reason}\n  Suggestion: {suggestion}")]
    NotFound {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Why resolution failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// An asset name pattern failed to compile.
    #[error("invalid asset pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected glob
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// The resolver HTTP client could not be constructed.
    #[error("resolver HTTP client construction failed: {reason}")]
    Client {
        /// Underlying builder error
        reason: String,
    },
}

impl ResolveError {
    /// Creates a `NotFound` error with the default suggestion.
    #[must_use]
    pub fn not_found(owner: &str, repo: &str, reason: &str) -> Self {
        Self::NotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
            reason: reason.to_string(),
            suggestion: "Check that the repository has a published release with at least one asset"
                .to_string(),
        }
    }

    /// Creates a `NotFound` error with a specific suggestion.
    #[must_use]
    pub fn not_found_with_suggestion(
        owner: &str,
        repo: &str,
        reason: &str,
        suggestion: &str,
    ) -> Self {
        Self::NotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates an `InvalidPattern` error.
    #[must_use]
    pub fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Client` error.
    #[must_use]
    pub fn client(reason: &str) -> Self {
        Self::Client {
            reason: reason.to_string(),
        }
    }
}
