//! Where a download lands on disk.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Destination of a download.
///
/// The file name inside a directory target is derived from the URL; a
/// [`DownloadTarget::File`] target is used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DownloadTarget {
    /// The current working directory, file named after the URL.
    #[default]
    WorkingDirectory,
    /// A directory (created if missing), file named after the URL.
    Directory(PathBuf),
    /// An explicit destination file path.
    File(PathBuf),
}

impl DownloadTarget {
    /// Infers a target from an optional user-supplied path.
    ///
    /// - no path: [`DownloadTarget::WorkingDirectory`]
    /// - an existing directory, or a path ending in a separator:
    ///   [`DownloadTarget::Directory`]
    /// - anything else: [`DownloadTarget::File`]
    #[must_use]
    pub fn infer(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::WorkingDirectory;
        };
        if path.is_dir() || ends_with_separator(&path) {
            Self::Directory(path)
        } else {
            Self::File(path)
        }
    }

    /// Final destination for a download whose URL-derived name is `file_name`.
    pub(crate) fn destination(&self, file_name: &str) -> PathBuf {
        match self {
            Self::WorkingDirectory => PathBuf::from(file_name),
            Self::Directory(dir) => dir.join(file_name),
            Self::File(path) => path.clone(),
        }
    }

    /// Directory that must exist before writing, if the target names one.
    pub(crate) fn directory(&self) -> Option<&Path> {
        match self {
            Self::WorkingDirectory => None,
            Self::Directory(dir) => Some(dir),
            Self::File(path) => path.parent().filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

fn ends_with_separator(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR)
}
