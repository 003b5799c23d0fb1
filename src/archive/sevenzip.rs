//! External 7-Zip invocation.
//!
//! Formats the zip reader cannot handle (7z, rar, and friends) are unpacked
//! by running the `7z` binary as a child process:
//!
//! ```text
//! 7z <e|x> <input> -o<output> [-p<password>] [<filter>...] [-r]
//! ```
//!
//! The child gets a fixed 10 second budget and is killed when it overruns.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::ArchiveError;

/// Archiver program used when none is configured.
pub const DEFAULT_PROGRAM: &str = "7z";

/// How long the archiver may run before it is killed.
pub const SEVENZIP_TIMEOUT: Duration = Duration::from_secs(10);

/// 7-Zip extraction command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractMethod {
    /// `e`: every file lands directly in the output directory.
    Flat,
    /// `x`: keep the archive's directory structure.
    #[default]
    FullPaths,
}

impl ExtractMethod {
    /// The 7-Zip command letter.
    #[must_use]
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Flat => "e",
            Self::FullPaths => "x",
        }
    }
}

impl fmt::Display for ExtractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for ExtractMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "e" => Ok(Self::Flat),
            "x" => Ok(Self::FullPaths),
            other => Err(format!("unknown extract method '{other}' (expected 'e' or 'x')")),
        }
    }
}

/// One archiver run.
#[derive(Debug, Clone)]
pub struct SevenZipJob {
    /// Archive to extract, or a directory whose newest file is extracted.
    pub input: PathBuf,
    /// Output directory; defaults to the archive's parent directory.
    pub output: Option<PathBuf>,
    /// Archive password.
    pub password: Option<String>,
    /// File filters passed through to 7-Zip (e.g. `*.dll`).
    pub extensions: Vec<String>,
    /// Archiver executable.
    pub program: PathBuf,
    /// Extraction command.
    pub method: ExtractMethod,
}

/// What the archiver reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SevenZipOutput {
    /// Process exit code; `-1` when the process was ended by a signal.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
}

impl SevenZipJob {
    /// Creates a job for `input` with every other setting at its default.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            password: None,
            extensions: Vec::new(),
            program: PathBuf::from(DEFAULT_PROGRAM),
            method: ExtractMethod::default(),
        }
    }

    /// The archive this job extracts.
    ///
    /// A directory input resolves to the most recently modified regular file
    /// inside it (creation time is used where modification time is
    /// unavailable).
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] when the input does not exist, cannot be
    /// listed, or is a directory with no files.
    pub fn resolve_input(&self) -> Result<PathBuf, ArchiveError> {
        let metadata =
            std::fs::metadata(&self.input).map_err(|e| ArchiveError::io(&self.input, e))?;
        if !metadata.is_dir() {
            return Ok(self.input.clone());
        }

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        let entries =
            std::fs::read_dir(&self.input).map_err(|e| ArchiveError::io(&self.input, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ArchiveError::io(&self.input, e))?;
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let Ok(stamp) = meta.modified().or_else(|_| meta.created()) else {
                continue;
            };
            if newest.as_ref().is_none_or(|(best, _)| stamp > *best) {
                newest = Some((stamp, entry.path()));
            }
        }

        newest.map(|(_, path)| path).ok_or_else(|| {
            ArchiveError::io(
                &self.input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory contains no files"),
            )
        })
    }

    /// Output directory for `input`.
    #[must_use]
    pub fn output_dir(&self, input: &Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        })
    }

    /// Command-line arguments for extracting `input`.
    ///
    /// `-r` is appended only with extension filters, so they match in
    /// subdirectories too.
    #[must_use]
    pub fn args(&self, input: &Path) -> Vec<OsString> {
        let mut args = vec![
            OsString::from(self.method.as_arg()),
            input.as_os_str().to_owned(),
        ];

        let mut output = OsString::from("-o");
        output.push(self.output_dir(input));
        args.push(output);

        if let Some(password) = &self.password {
            args.push(OsString::from(format!("-p{password}")));
        }

        if !self.extensions.is_empty() {
            args.extend(self.extensions.iter().map(OsString::from));
            args.push(OsString::from("-r"));
        }
        args
    }

    /// Runs the archiver and waits for it.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::Io`] when the input cannot be resolved
    /// - [`ArchiveError::Spawn`] when the program cannot be started
    /// - [`ArchiveError::Timeout`] when it runs longer than [`SEVENZIP_TIMEOUT`]
    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    pub async fn run(&self) -> Result<SevenZipOutput, ArchiveError> {
        let limit = SEVENZIP_TIMEOUT;
        let input = self.resolve_input()?;
        let args = self.args(&input);
        let program = self.program.display().to_string();
        debug!(?args, "starting archiver");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ArchiveError::spawn(&program, e))?;

        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!(seconds = limit.as_secs(), "archiver timed out, killing it");
                ArchiveError::timeout(&program, limit.as_secs())
            })?
            .map_err(|e| ArchiveError::spawn(&program, e))?;

        let exit_code = output.status.code().unwrap_or(-1);
        info!(input = %input.display(), exit_code, "archiver finished");
        Ok(SevenZipOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
