//! Flat copy of files matching a glob.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wax::Glob;

use super::ArchiveError;

/// Default pattern of files copied out of extracted dependencies.
pub const DEFAULT_COPY_PATTERN: &str = "*.dll";

/// Copies every file under `source` matching `pattern` into `destination`.
///
/// A pattern without `/` matches at any depth (`*.dll` walks as `**/*.dll`).
/// Copies are flat: the relative directory structure is dropped and a later
/// match with the same file name overwrites an earlier one. Files already in
/// `destination` (when it is nested under `source`) are left alone. Returns the
/// number of files copied; no match is not an error.
///
/// # Errors
///
/// - [`ArchiveError::MissingDirectory`] when `source` or `destination` is not
///   an existing directory
/// - [`ArchiveError::Pattern`] when the glob does not compile
/// - [`ArchiveError::Io`] when walking or copying fails
#[tracing::instrument(skip(source, destination), fields(source = %source.display(), destination = %destination.display()))]
pub fn copy_matching(
    source: &Path,
    destination: &Path,
    pattern: &str,
) -> Result<usize, ArchiveError> {
    if !source.is_dir() {
        return Err(ArchiveError::missing_directory("source", source));
    }
    if !destination.is_dir() {
        return Err(ArchiveError::missing_directory("destination", destination));
    }

    let expression = if pattern.contains('/') {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    };
    let glob = Glob::new(&expression).map_err(|e| ArchiveError::pattern(pattern, e.to_string()))?;

    // Collected up front so files copied into a destination nested under
    // `source` are not walked again.
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in glob.walk(source) {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| source.to_path_buf(), Path::to_path_buf);
            ArchiveError::io(path, std::io::Error::from(e))
        })?;
        if entry.file_type().is_file() {
            matches.push(entry.into_path());
        }
    }

    let destination_real =
        std::fs::canonicalize(destination).map_err(|e| ArchiveError::io(destination, e))?;

    let mut copied = 0;
    for path in &matches {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        // Copying a file onto itself truncates it.
        if is_inside(path, &destination_real) {
            debug!(path = %path.display(), "already in destination, skipped");
            continue;
        }
        let target = destination.join(file_name);
        std::fs::copy(path, &target).map_err(|e| ArchiveError::io(&target, e))?;
        debug!(from = %path.display(), to = %target.display(), "copied");
        copied += 1;
    }

    info!(pattern, copied, "copied matching files");
    Ok(copied)
}

/// True when `path` sits directly in `directory` (already canonical).
fn is_inside(path: &Path, directory: &Path) -> bool {
    path.parent()
        .and_then(|parent| std::fs::canonicalize(parent).ok())
        .is_some_and(|parent| parent == directory)
}
