//! Dependency fetcher core library.
//!
//! Resolves a list of URLs (direct file links or GitHub repositories) into
//! downloaded archives, extracts them, and copies selected files to a
//! destination directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - URL classification into GitHub repositories and direct links
//! - [`resolver`] - Latest-release asset resolution through the GitHub API
//! - [`download`] - Streaming HTTP downloads to an explicit target
//! - [`archive`] - Zip extraction, top-level directory inspection, file copy, external 7-Zip
//! - [`pipeline`] - Sequential, fail-fast orchestration of the steps above
//!
//! The library emits `tracing` events and never installs a subscriber; the
//! binaries do that.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod download;
pub mod parser;
pub mod pipeline;
pub mod resolver;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use archive::{
    ArchiveError, ArchiveInfo, DEFAULT_COPY_PATTERN, ExtractMethod, ExtractSummary, SevenZipJob,
    SevenZipOutput, copy_matching, extract, inspect, is_zip_file, top_level_directory,
};
pub use download::{DownloadError, DownloadResult, DownloadTarget, HttpClient};
pub use parser::{DescriptorKind, ParseError, UrlDescriptor, classify};
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, PipelineReport, ProcessedUrl};
pub use resolver::{
    AssetResolver, AssetSelection, GithubResolver, GithubResolverOptions, ResolveError,
    ResolvedAsset, resolve_descriptor,
};
