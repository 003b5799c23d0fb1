//! Release asset selection policy.

use std::fmt;

use wax::{Glob, Pattern};

use super::ResolveError;
use super::github::ReleaseAsset;

/// Which asset of a release gets downloaded.
///
/// GitHub lists assets in upload order, so [`AssetSelection::First`] is
/// deterministic but breaks for releases that ship several builds; use a
/// pattern or an explicit index for those.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetSelection {
    /// The first listed asset.
    #[default]
    First,
    /// The asset at this zero-based position.
    Index(usize),
    /// The first asset whose name matches this glob.
    Pattern(String),
}

impl AssetSelection {
    /// Creates a pattern selection, validating the glob up front.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidPattern`] if the glob does not compile.
    pub fn pattern(pattern: impl Into<String>) -> Result<Self, ResolveError> {
        let pattern = pattern.into();
        Glob::new(&pattern)
            .map_err(|error| ResolveError::invalid_pattern(&pattern, &error.to_string()))?;
        Ok(Self::Pattern(pattern))
    }

    /// Picks an asset from a release's asset list.
    ///
    /// The chosen asset is returned even when it has no download URL; the
    /// caller reports that as a resolution failure rather than trying the
    /// next asset.
    pub(crate) fn select<'a>(&self, assets: &'a [ReleaseAsset]) -> Option<&'a ReleaseAsset> {
        match self {
            Self::First => assets.first(),
            Self::Index(index) => assets.get(*index),
            Self::Pattern(pattern) => {
                let glob = Glob::new(pattern).ok()?;
                assets.iter().find(|asset| {
                    asset
                        .display_name()
                        .is_some_and(|name| glob.is_match(name))
                })
            }
        }
    }
}

impl fmt::Display for AssetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Index(index) => write!(f, "index {index}"),
            Self::Pattern(pattern) => write!(f, "pattern '{pattern}'"),
        }
    }
}
