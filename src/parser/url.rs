//! URL validation and classification.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};
use url::Url;

use super::descriptor::UrlDescriptor;
use super::error::{MAX_URL_LENGTH, ParseError};

/// Hosts that serve GitHub repository pages.
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// GitHub caps user and organization names at 39 characters.
const MAX_OWNER_LENGTH: usize = 39;

/// Owner names: ASCII alphanumerics separated by single hyphens.
#[allow(clippy::expect_used)]
static OWNER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:-?[A-Za-z0-9])*$").expect("owner regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static REPOSITORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").expect("repository regex is valid") // Static pattern, safe to panic
});

/// Classifies a raw URL as a GitHub repository or a direct link.
///
/// A URL is a GitHub repository when its host is `github.com` and its path has
/// exactly two or three non-empty segments, the first two being a plausible
/// owner and repository name. Everything else is a direct link, whose file
/// name is inferred when the last path segment has an extension.
///
/// # Errors
///
/// Returns [`ParseError`] when the URL cannot be parsed, is too long, does not
/// use http(s), or has no host.
///
/// # Examples
///
/// ```
/// use depfetch_core::parser::classify;
///
/// let desc = classify("https://github.com/acme/widget").unwrap();
/// assert_eq!(desc.github_repository(), Some(("acme", "widget")));
///
/// let desc = classify("https://cdn.example.com/lib-1.2.zip").unwrap();
/// assert_eq!(desc.file_name(), Some("lib-1.2.zip"));
/// ```
#[tracing::instrument(skip(raw), fields(url = %raw.trim()))]
pub fn classify(raw: &str) -> Result<UrlDescriptor, ParseError> {
    let raw = raw.trim();
    let parsed = validate_url(raw)?;

    if let Some((owner, repo)) = github_repository(&parsed) {
        info!(%owner, %repo, "URL is a GitHub repository URL");
        return Ok(UrlDescriptor::github(raw, owner, repo));
    }

    let file_name = inferred_file_name(&parsed);
    match &file_name {
        Some(name) => info!(file_name = %name, "URL designates a file"),
        None => info!("URL is a standard URL"),
    }
    Ok(UrlDescriptor::direct(raw, file_name))
}

/// Validates a URL string.
///
/// # Validation rules:
/// - Must not exceed `MAX_URL_LENGTH` (2000 chars)
/// - Must be parseable by the `url` crate
/// - Must use http or https scheme (no ftp, file, etc.)
/// - Must have a host (domain or IP)
fn validate_url(raw: &str) -> Result<Url, ParseError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(ParseError::too_long(raw));
    }

    let parsed = Url::parse(raw).map_err(|e| ParseError::unparseable(raw, e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ParseError::unsupported_scheme(raw, scheme)),
    }

    if parsed.host().is_none() {
        return Err(ParseError::missing_host(raw));
    }

    Ok(parsed)
}

/// Extracts `(owner, repo)` when the URL names a GitHub repository.
fn github_repository(url: &Url) -> Option<(String, String)> {
    let host = url.host_str()?;
    if !GITHUB_HOSTS
        .iter()
        .any(|candidate| host.eq_ignore_ascii_case(candidate))
    {
        return None;
    }

    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return None;
    }

    let segments: Vec<&str> = path.split('/').collect();
    if !(2..=3).contains(&segments.len()) || segments.iter().any(|s| s.is_empty()) {
        debug!(segments = segments.len(), "GitHub path is not owner/repo[/x]");
        return None;
    }

    let owner = segments[0];
    let repo = segments[1].strip_suffix(".git").unwrap_or(segments[1]);
    if !is_plausible_owner(owner) || !is_plausible_repository(repo) {
        debug!(%owner, %repo, "GitHub path does not name a repository");
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

fn is_plausible_owner(owner: &str) -> bool {
    owner.len() <= MAX_OWNER_LENGTH && OWNER_PATTERN.is_match(owner)
}

fn is_plausible_repository(repo: &str) -> bool {
    repo != "." && repo != ".." && REPOSITORY_PATTERN.is_match(repo)
}

/// Returns the last non-empty path segment when it carries an extension.
fn inferred_file_name(url: &Url) -> Option<String> {
    let last = url.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |d| d.into_owned());
    has_extension(&decoded).then_some(decoded)
}

/// A `.` that is neither the first nor the last character marks an extension.
fn has_extension(name: &str) -> bool {
    name.rfind('.')
        .is_some_and(|index| index > 0 && index + 1 < name.len())
}
