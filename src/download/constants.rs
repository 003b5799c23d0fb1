//! Constants for the download module.

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default whole-request timeout (5 minutes, for large archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Write buffer size for streaming response bodies to disk (64 KiB).
pub const DOWNLOAD_BUFFER_SIZE: usize = 64 * 1024;

/// Suffix of the temporary file a download is streamed into.
pub(crate) const PARTIAL_SUFFIX: &str = ".part";
