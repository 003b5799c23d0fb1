//! HTTP client wrapper for downloading files.
//!
//! This module provides the `HttpClient` struct which streams a response body
//! to disk with bounded memory and leaves the destination either complete or
//! untouched.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{
    CONNECT_TIMEOUT_SECS, DOWNLOAD_BUFFER_SIZE, PARTIAL_SUFFIX, READ_TIMEOUT_SECS,
};
use super::error::DownloadError;
use super::filename::filename_from_url;
use super::target::DownloadTarget;
use crate::user_agent;

/// HTTP client for downloading files with streaming support.
///
/// Create once and reuse for every URL of a run so connections are pooled.
///
/// # Example
///
/// ```no_run
/// use depfetch_core::download::{DownloadTarget, HttpClient};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let target = DownloadTarget::Directory(PathBuf::from("deps"));
/// let result = client.download("https://example.com/lib.zip", &target).await?;
/// println!("Downloaded to: {}", result.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// Final output path.
    pub path: PathBuf,
    /// Bytes written to `path`.
    pub bytes_written: u64,
    /// Size announced by the server, when known.
    pub content_length: Option<u64>,
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Total timeout: 5 minutes (for large archives)
    /// - Gzip decompression: enabled
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the client cannot be built.
    pub fn new() -> Result<Self, DownloadError> {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the client cannot be built.
    pub fn new_with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|error| DownloadError::client(error.to_string()))?;
        Ok(Self { client })
    }

    /// Downloads `url` to `target`.
    ///
    /// The response status is checked before anything is written. The body is
    /// streamed into `<destination>.part`, which replaces any existing
    /// destination file only once the whole body has arrived. On failure the
    /// `.part` file is removed and the destination is left as it was.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] for unparseable or non-http(s) URLs
    /// - [`DownloadError::HttpStatus`] for any non-success response
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] for transport failures
    /// - [`DownloadError::Io`] when the directory, temporary file, or destination
    ///   cannot be created or replaced
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download(
        &self,
        url: &str,
        target: &DownloadTarget,
    ) -> Result<DownloadResult, DownloadError> {
        debug!("starting download");

        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url));
        }

        let file_name = filename_from_url(&parsed_url);
        let destination = target.destination(&file_name);

        let response = self.send_request(url).await?;
        let content_length = response.content_length();

        if let Some(dir) = target.directory() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| DownloadError::io(dir, e))?;
        }

        let partial = partial_path(&destination);
        debug!(path = %destination.display(), partial = %partial.display(), "resolved output path");

        let file = File::create(&partial)
            .await
            .map_err(|e| DownloadError::io(partial.clone(), e))?;

        let written = match stream_to_file(file, response, url, &partial).await {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %partial.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(error);
            }
        };

        if let Err(error) = replace_destination(&partial, &destination).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(error);
        }

        info!(path = %destination.display(), bytes = written, "download complete");

        Ok(DownloadResult {
            path: destination,
            bytes_written: written,
            content_length,
        })
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// `<destination>.part`, next to the destination.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_BUFFER_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_transport(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

/// Deletes an existing destination file, then moves the finished download in.
async fn replace_destination(partial: &Path, destination: &Path) -> Result<(), DownloadError> {
    match tokio::fs::remove_file(destination).await {
        Ok(()) => debug!(path = %destination.display(), "removed existing file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(DownloadError::io(destination, e)),
    }

    tokio::fs::rename(partial, destination)
        .await
        .map_err(|e| DownloadError::io(destination, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("deps/widget.zip")),
            PathBuf::from("deps/widget.zip.part")
        );
    }

    #[tokio::test]
    async fn test_download_into_directory_uses_url_name() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/files/widget-1.0.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip bytes here"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/files/widget-1.0.zip", mock_server.uri());
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());

        let result = client.download(&url, &target).await.unwrap();

        assert_eq!(result.path, temp_dir.path().join("widget-1.0.zip"));
        assert_eq!(result.bytes_written, 14);
        assert_eq!(std::fs::read(&result.path).unwrap(), b"zip bytes here");
        assert_eq!(dir_entries(temp_dir.path()), vec!["widget-1.0.zip"]);
    }

    #[tokio::test]
    async fn test_download_creates_missing_directory() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/lib.dll"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MZ"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let target = DownloadTarget::Directory(nested.clone());
        let url = format!("{}/lib.dll", mock_server.uri());

        let result = client.download(&url, &target).await.unwrap();
        assert_eq!(result.path, nested.join("lib.dll"));
        assert!(result.path.is_file());
    }

    #[tokio::test]
    async fn test_download_to_file_target_replaces_existing() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("custom-name.zip");
        std::fs::write(&dest, b"old contents that are longer").unwrap();

        Mock::given(method("GET"))
            .and(path("/widget.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/widget.zip", mock_server.uri());
        let result = client
            .download(&url, &DownloadTarget::File(dest.clone()))
            .await
            .unwrap();

        assert_eq!(result.path, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
        assert_eq!(dir_entries(temp_dir.path()), vec!["custom-name.zip"]);
    }

    #[tokio::test]
    async fn test_download_404_leaves_existing_file_untouched() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("widget.zip");
        std::fs::write(&dest, b"previous").unwrap();

        Mock::given(method("GET"))
            .and(path("/widget.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/widget.zip", mock_server.uri());
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());

        let result = client.download(&url, &target).await;
        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous");
        assert_eq!(dir_entries(temp_dir.path()), vec!["widget.zip"]);
    }

    #[tokio::test]
    async fn test_download_500_creates_nothing() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/error.zip"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let missing_dir = temp_dir.path().join("never-created");
        let target = DownloadTarget::Directory(missing_dir.clone());
        let url = format!("{}/error.zip", mock_server.uri());

        let result = client.download(&url, &target).await;
        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 500, .. })
        ));
        assert!(!missing_dir.exists(), "status is checked before touching disk");
    }

    #[tokio::test]
    async fn test_download_204_is_http_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/empty.zip"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());
        let url = format!("{}/empty.zip", mock_server.uri());

        let result = client.download(&url, &target).await;
        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 204, .. })
        ));
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_download_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let client = HttpClient::new().unwrap();
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());

        let result = client.download("not-a-valid-url", &target).await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));

        let result = client.download("ftp://example.com/a.zip", &target).await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_download_large_file_streams() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        let large_content = vec![7u8; 1024 * 1024 + 17];

        Mock::given(method("GET"))
            .and(path("/large.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(large_content.clone()))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/large.bin", mock_server.uri());
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());

        let result = client.download(&url, &target).await.unwrap();
        assert_eq!(result.bytes_written, large_content.len() as u64);
        assert_eq!(result.content_length, Some(large_content.len() as u64));
        assert_eq!(std::fs::read(&result.path).unwrap(), large_content);
    }

    #[tokio::test]
    async fn test_download_cleanup_on_read_timeout() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/slow.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"data")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new_with_timeouts(30, 1).unwrap();
        let url = format!("{}/slow.zip", mock_server.uri());
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());

        let result = client.download(&url, &target).await;
        assert!(
            matches!(
                result,
                Err(DownloadError::Timeout { .. } | DownloadError::Network { .. })
            ),
            "expected timeout or network error, got: {result:?}"
        );
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_download_sends_user_agent() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/ua.zip"))
            .and(header_regex("user-agent", r"^depfetch/"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/ua.zip", mock_server.uri());
        let target = DownloadTarget::Directory(temp_dir.path().to_path_buf());

        let result = client.download(&url, &target).await;
        assert!(result.is_ok(), "{result:?}");
    }
}
