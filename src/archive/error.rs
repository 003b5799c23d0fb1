//! Error types for archive handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from extracting, inspecting, copying, or running the external archiver.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The file is not a zip container.
    #[error("{path} is not a zip archive\n  Suggestion: only zip archives can be extracted; use extract-archive for 7z files")]
    NotZip {
        /// Offending file
        path: PathBuf,
    },

    /// The zip reader failed (corrupt data, wrong password, unsupported method).
    #[error("failed to read zip archive {path}: {source}")]
    Zip {
        /// Archive being read
        path: PathBuf,
        /// Underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// File system error while reading, writing, or copying.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A directory the operation needs does not exist.
    #[error("{role} directory does not exist: {path}")]
    MissingDirectory {
        /// Which side was missing ("source" or "destination")
        role: &'static str,
        /// The missing directory
        path: PathBuf,
    },

    /// A file-matching glob failed to compile.
    #[error("invalid file pattern '{pattern}': {reason}")]
    Pattern {
        /// Rejected glob
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// The external archiver could not be started.
    #[error("failed to start archiver '{program}': {source}\n  Suggestion: install 7-Zip or pass its location with --program_path")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The external archiver did not finish in time and was killed.
    #[error("archiver '{program}' did not finish within {seconds}s")]
    Timeout {
        /// Program that timed out
        program: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// A blocking extraction or copy task panicked or was cancelled.
    #[error("archive {step} did not complete: {reason}")]
    Interrupted {
        /// `extract` or `copy`
        step: &'static str,
        /// Panic or cancellation message
        reason: String,
    },
}

impl ArchiveError {
    /// Creates a `NotZip` error.
    pub fn not_zip(path: impl Into<PathBuf>) -> Self {
        Self::NotZip { path: path.into() }
    }

    /// Creates a `Zip` error.
    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }

    /// Creates an `Io` error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a `MissingDirectory` error.
    pub fn missing_directory(role: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory {
            role,
            path: path.into(),
        }
    }

    /// Creates a `Pattern` error.
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Spawn` error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a `Timeout` error.
    pub fn timeout(program: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            program: program.into(),
            seconds,
        }
    }

    pub(crate) fn interrupted(step: &'static str, error: &tokio::task::JoinError) -> Self {
        Self::Interrupted {
            step,
            reason: error.to_string(),
        }
    }
}
