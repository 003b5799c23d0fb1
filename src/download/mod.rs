//! Streaming HTTP downloads.
//!
//! # Features
//!
//! - Streaming downloads through a fixed 64 KiB buffer (memory stays bounded)
//! - File name taken from the last URL path segment
//! - Explicit [`DownloadTarget`]: working directory, directory, or file path
//! - Destination is replaced only after the body has fully arrived
//! - Configurable timeouts (30s connect, 5min total by default)
//!
//! # Example
//!
//! ```no_run
//! use depfetch_core::download::{DownloadTarget, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let result = client
//!     .download("https://example.com/lib.zip", &DownloadTarget::WorkingDirectory)
//!     .await?;
//! println!("Downloaded {} bytes", result.bytes_written);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod target;

pub use client::{DownloadResult, HttpClient};
pub use constants::{CONNECT_TIMEOUT_SECS, DOWNLOAD_BUFFER_SIZE, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use target::DownloadTarget;
