//! Sequential fetch pipeline: classify, resolve, download, extract, copy.
//!
//! Every URL is classified before any network traffic. URLs are then
//! processed one at a time, and the first failure stops the run. Files
//! produced for earlier URLs stay on disk.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::archive::{self, ArchiveError, DEFAULT_COPY_PATTERN, ExtractSummary};
use crate::download::{DownloadError, DownloadResult, DownloadTarget, HttpClient};
use crate::parser::{ParseError, UrlDescriptor, classify};
use crate::resolver::{AssetResolver, ResolveError, resolve_descriptor};

/// What to do with each URL.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Where downloads land.
    pub download_target: DownloadTarget,
    /// Extract each download as a zip.
    pub extract: bool,
    /// Extraction directory; the working directory when unset.
    pub extract_path: Option<PathBuf>,
    /// Password applied to every archive.
    pub zip_password: Option<String>,
    /// Directory receiving files matching `copy_pattern` after extraction.
    pub copy_destination: Option<PathBuf>,
    /// Glob of files to copy.
    pub copy_pattern: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            download_target: DownloadTarget::default(),
            extract: false,
            extract_path: None,
            zip_password: None,
            copy_destination: None,
            copy_pattern: DEFAULT_COPY_PATTERN.to_string(),
        }
    }
}

/// Outcome for one URL.
#[derive(Debug, Clone)]
pub struct ProcessedUrl {
    /// The URL as given.
    pub url: String,
    /// Where it was downloaded.
    pub download: DownloadResult,
    /// Extraction counts, when extraction ran.
    pub extracted: Option<ExtractSummary>,
    /// Number of files copied, when a copy destination is configured.
    pub copied: Option<usize>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// One entry per URL, in input order.
    pub processed: Vec<ProcessedUrl>,
}

/// The first failure of a run. `index` is 1-based.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Nothing to do.
    #[error("no URLs to process\n  Suggestion: pass at least one URL with -u")]
    NoUrls,

    /// A URL failed classification; nothing was downloaded.
    #[error("URL #{index} rejected: {source}")]
    Parse {
        /// Position of the URL
        index: usize,
        /// Classification error
        #[source]
        source: ParseError,
    },

    /// A GitHub repository could not be resolved to a release asset.
    #[error("URL #{index} ({url}): {source}")]
    Resolve {
        /// Position of the URL
        index: usize,
        /// The URL as given
        url: String,
        /// Resolution error
        #[source]
        source: ResolveError,
    },

    /// The download failed.
    #[error("URL #{index} ({url}): {source}")]
    Download {
        /// Position of the URL
        index: usize,
        /// The URL as given
        url: String,
        /// Download error
        #[source]
        source: DownloadError,
    },

    /// Extraction or copying failed.
    #[error("URL #{index} ({url}): {source}")]
    Archive {
        /// Position of the URL
        index: usize,
        /// The URL as given
        url: String,
        /// Archive error
        #[source]
        source: ArchiveError,
    },
}

/// Runs the fetch steps for a list of URLs.
pub struct Pipeline {
    client: HttpClient,
    resolver: Box<dyn AssetResolver>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        client: HttpClient,
        resolver: Box<dyn AssetResolver>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            client,
            resolver,
            options,
        }
    }

    /// The options this pipeline runs with.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Processes `urls` in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`]; later URLs are not attempted.
    #[tracing::instrument(skip_all, fields(urls = urls.len()))]
    pub async fn run<S: AsRef<str>>(&self, urls: &[S]) -> Result<PipelineReport, PipelineError> {
        if urls.is_empty() {
            return Err(PipelineError::NoUrls);
        }

        let descriptors = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                classify(url.as_ref()).map_err(|source| PipelineError::Parse {
                    index: i + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = PipelineReport::default();
        for (i, descriptor) in descriptors.iter().enumerate() {
            let processed = self.process(i + 1, descriptor).await?;
            report.processed.push(processed);
        }

        info!(processed = report.processed.len(), "all URLs processed");
        Ok(report)
    }

    #[tracing::instrument(skip(self, descriptor), fields(url = %descriptor.url()))]
    async fn process(
        &self,
        index: usize,
        descriptor: &UrlDescriptor,
    ) -> Result<ProcessedUrl, PipelineError> {
        let url = descriptor.url().to_string();
        info!(%descriptor, "processing");

        let download_url = resolve_descriptor(self.resolver.as_ref(), descriptor)
            .await
            .map_err(|source| PipelineError::Resolve {
                index,
                url: url.clone(),
                source,
            })?;

        let download = self
            .client
            .download(&download_url, &self.options.download_target)
            .await
            .map_err(|source| PipelineError::Download {
                index,
                url: url.clone(),
                source,
            })?;

        if !self.options.extract {
            return Ok(ProcessedUrl {
                url,
                download,
                extracted: None,
                copied: None,
            });
        }

        let archive_error = |source: ArchiveError| PipelineError::Archive {
            index,
            url: url.clone(),
            source,
        };

        let extract_root = self
            .options
            .extract_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let extracted = {
            let archive_path = download.path.clone();
            let root = extract_root.clone();
            let password = self.options.zip_password.clone();
            run_blocking("extract", move || {
                archive::extract(&archive_path, Some(&root), password.as_deref())
            })
            .await
            .map_err(archive_error)?
        };

        let copied = match &self.options.copy_destination {
            Some(destination) => {
                let archive_path = download.path.clone();
                let destination = destination.clone();
                let pattern = self.options.copy_pattern.clone();
                let count = run_blocking("copy", move || {
                    let source = match archive::top_level_directory(&archive_path) {
                        Some(dir) => extract_root.join(dir),
                        None => extract_root,
                    };
                    debug!(source = %source.display(), "copy source");
                    archive::copy_matching(&source, &destination, &pattern)
                })
                .await
                .map_err(archive_error)?;
                Some(count)
            }
            None => None,
        };

        Ok(ProcessedUrl {
            url,
            download,
            extracted: Some(extracted),
            copied,
        })
    }
}

/// Runs zip and file-system work on the blocking pool.
async fn run_blocking<T, F>(step: &'static str, task: F) -> Result<T, ArchiveError>
where
    F: FnOnce() -> Result<T, ArchiveError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|error| ArchiveError::interrupted(step, &error))?
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("resolver", &self.resolver.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
