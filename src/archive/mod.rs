//! Archive handling for downloaded dependencies.
//!
//! - [`extract`] / [`is_zip_file`] - zip extraction, with optional password
//! - [`inspect`] / [`top_level_directory`] - find the directory wrapping an archive's content
//! - [`copy_matching`] - flat copy of matching files (DLLs by default) out of an extracted tree
//! - [`SevenZipJob`] - runs the external `7z` binary for formats the zip reader does not cover
//!
//! All zip and file-system work here is synchronous.

mod copy;
mod error;
mod extract;
mod sevenzip;

pub use copy::{DEFAULT_COPY_PATTERN, copy_matching};
pub use error::ArchiveError;
pub use extract::{ArchiveInfo, ExtractSummary, extract, inspect, is_zip_file, top_level_directory};
pub use sevenzip::{
    DEFAULT_PROGRAM, ExtractMethod, SEVENZIP_TIMEOUT, SevenZipJob, SevenZipOutput,
};
