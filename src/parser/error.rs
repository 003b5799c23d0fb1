//! Errors raised while classifying `-u` arguments.

use thiserror::Error;

/// Longest `-u` argument accepted, in bytes.
pub const MAX_URL_LENGTH: usize = 2000;

/// Characters of an over-long URL echoed back in the error.
const PREVIEW_CHARS: usize = 60;

/// Why a URL cannot be fetched.
///
/// Every variant aborts the run before any request is made.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Not an absolute http(s) URL with a host.
    #[error("cannot fetch '{url}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrl {
        /// The argument as given
        url: String,
        /// What is wrong with it
        reason: String,
        /// How to write it instead
        suggestion: String,
    },

    /// Longer than [`MAX_URL_LENGTH`].
    #[error(
        "URL is {length} bytes, over the {max} byte limit: {url_preview}...\n  Suggestion: Check that two -u arguments were not pasted together"
    )]
    UrlTooLong {
        /// Leading characters of the URL
        url_preview: String,
        /// Length in bytes
        length: usize,
        /// The limit
        max: usize,
    },
}

impl ParseError {
    pub(crate) fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("'{scheme}' links are not downloadable"),
            suggestion: "Dependencies are fetched over HTTP; use the https:// link of the release or file"
                .to_string(),
        }
    }

    pub(crate) fn unparseable(url: &str, error: url::ParseError) -> Self {
        let suggestion = match error {
            url::ParseError::RelativeUrlWithoutBase => {
                "Give a full link such as https://github.com/<owner>/<repo>"
            }
            url::ParseError::EmptyHost | url::ParseError::InvalidDomainCharacter => {
                "The host name is empty or contains invalid characters"
            }
            _ => "Copy the link again from the browser address bar",
        };
        Self::InvalidUrl {
            url: url.to_string(),
            reason: error.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    pub(crate) fn missing_host(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "there is no server to download from".to_string(),
            suggestion: "Include the host, e.g. https://github.com/<owner>/<repo>".to_string(),
        }
    }

    pub(crate) fn too_long(url: &str) -> Self {
        Self::UrlTooLong {
            url_preview: url.chars().take(PREVIEW_CHARS).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }
}
