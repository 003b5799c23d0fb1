//! File name derivation for downloads.

use std::path::{Component, Path};

use tracing::debug;
use url::Url;

/// Replaces characters that are invalid in file names on common platforms.
///
/// Dot-only names (`.`, `..`) are rewritten so the result can never step out
/// of the directory it is joined onto.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_plain_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_plain_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// File name for a URL: its last path segment, percent-decoded and sanitized.
///
/// URLs whose path ends in `/` (or has no path) get `download_<unix-secs>.bin`.
pub(crate) fn filename_from_url(url: &Url) -> String {
    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last).unwrap_or_else(|error| {
            debug!(segment = %last, %error, "URL decoding failed, using raw segment");
            last.into()
        });
        return sanitize_filename(&decoded);
    }

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("download_{timestamp}.bin")
}
