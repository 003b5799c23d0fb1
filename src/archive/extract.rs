//! Zip detection, extraction, and top-level directory inspection.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use super::ArchiveError;

/// What an archive looks like from the outside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// The file opens as a zip container.
    pub is_zip: bool,
    /// The first entry of the archive is a directory.
    pub first_entry_is_dir: bool,
    /// Name of that first directory, without the trailing `/`.
    pub top_level_dir: Option<String>,
}

/// Counts from one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Directory the archive was extracted into.
    pub destination: PathBuf,
    /// Regular files written.
    pub files: usize,
    /// Directories created for directory entries.
    pub directories: usize,
    /// Entries skipped because their names would escape `destination`.
    pub skipped: usize,
}

fn open_zip(path: &Path) -> Result<ZipArchive<BufReader<File>>, ArchiveError> {
    let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::zip(path, e))
}

/// Returns true when `path` is an existing regular file that opens as a zip.
#[must_use]
pub fn is_zip_file(path: &Path) -> bool {
    path.is_file() && open_zip(path).is_ok()
}

/// Extracts every entry of a zip archive.
///
/// `extract_path` defaults to the working directory and is created if
/// missing. `password` is applied to encrypted entries; unencrypted entries
/// ignore it. Entries whose names are absolute or contain `..` are skipped
/// with a warning.
///
/// # Errors
///
/// - [`ArchiveError::NotZip`] when `archive` is not a zip (checked before
///   anything is written)
/// - [`ArchiveError::Zip`] for corrupt entries or a wrong/missing password
/// - [`ArchiveError::Io`] when files or directories cannot be written
#[tracing::instrument(skip(password), fields(archive = %archive.display()))]
pub fn extract(
    archive: &Path,
    extract_path: Option<&Path>,
    password: Option<&str>,
) -> Result<ExtractSummary, ArchiveError> {
    if !is_zip_file(archive) {
        warn!("not a zip archive, nothing extracted");
        return Err(ArchiveError::not_zip(archive));
    }

    let destination = extract_path.unwrap_or_else(|| Path::new(".")).to_path_buf();
    fs::create_dir_all(&destination).map_err(|e| ArchiveError::io(&destination, e))?;

    let mut zip = open_zip(archive)?;
    let mut summary = ExtractSummary {
        destination: destination.clone(),
        files: 0,
        directories: 0,
        skipped: 0,
    };

    for index in 0..zip.len() {
        let entry = match password {
            Some(pw) => zip.by_index_decrypt(index, pw.as_bytes()),
            None => zip.by_index(index),
        };
        let mut entry = entry.map_err(|e| ArchiveError::zip(archive, e))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping entry with unsafe path");
            summary.skipped += 1;
            continue;
        };
        let output_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|e| ArchiveError::io(&output_path, e))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        let mut outfile =
            File::create(&output_path).map_err(|e| ArchiveError::io(&output_path, e))?;
        std::io::copy(&mut entry, &mut outfile).map_err(|e| ArchiveError::io(&output_path, e))?;
        debug!(path = %output_path.display(), "extracted");
        summary.files += 1;
    }

    info!(
        destination = %destination.display(),
        files = summary.files,
        directories = summary.directories,
        skipped = summary.skipped,
        "archive extracted"
    );
    Ok(summary)
}

/// Describes an archive without extracting it.
///
/// A file that is not a zip yields `is_zip: false` rather than an error. Zip
/// entry names are stored unencrypted, so no password is needed.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] when the file cannot be opened, and
/// [`ArchiveError::Zip`] when its first entry cannot be read.
pub fn inspect(path: &Path) -> Result<ArchiveInfo, ArchiveError> {
    let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
    let Ok(mut zip) = ZipArchive::new(BufReader::new(file)) else {
        return Ok(ArchiveInfo::default());
    };

    if zip.is_empty() {
        return Ok(ArchiveInfo {
            is_zip: true,
            ..ArchiveInfo::default()
        });
    }

    let first = zip.by_index_raw(0).map_err(|e| ArchiveError::zip(path, e))?;
    let first_entry_is_dir = first.is_dir();
    let top_level_dir = if first_entry_is_dir && first.enclosed_name().is_some() {
        Some(first.name().trim_end_matches(['/', '\\']).to_string())
            .filter(|name| !name.is_empty())
    } else {
        None
    };

    Ok(ArchiveInfo {
        is_zip: true,
        first_entry_is_dir,
        top_level_dir,
    })
}

/// Name of the directory wrapping the archive's content, when its first entry
/// is one.
#[must_use]
pub fn top_level_directory(path: &Path) -> Option<String> {
    match inspect(path) {
        Ok(info) => info.top_level_dir,
        Err(error) => {
            debug!(path = %path.display(), %error, "cannot inspect archive");
            None
        }
    }
}
