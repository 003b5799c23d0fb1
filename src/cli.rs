//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use depfetch_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use depfetch_core::resolver::{
    DEFAULT_API_BASE_URL, RESOLVER_CONNECT_TIMEOUT_SECS, RESOLVER_READ_TIMEOUT_SECS,
};
use depfetch_core::{
    AssetSelection, DEFAULT_COPY_PATTERN, DownloadTarget, GithubResolverOptions, PipelineOptions,
    ResolveError,
};

/// Download required dependencies from GitHub releases or direct web links.
///
/// Each `-u` URL is either a GitHub repository (its latest release asset is
/// fetched) or a direct file link. Downloads can be extracted and their DLLs
/// copied to a destination directory.
#[derive(Parser, Debug)]
#[command(name = "depfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Add a URL to the list (repeatable; may be a GitHub repository URL)
    #[arg(short = 'u', value_name = "URL", required = true)]
    pub urls: Vec<String>,

    /// Where to download archives: a directory, or a file path for a single URL [default: working directory]
    #[arg(short = 'd', long = "download_path", visible_alias = "download-path", value_name = "PATH")]
    pub download_path: Option<PathBuf>,

    /// Directory receiving the files matched by --copy-pattern after extraction
    #[arg(short = 'c', long = "copy_destination", visible_alias = "copy-destination", value_name = "DIR")]
    pub copy_destination: Option<PathBuf>,

    /// Extract downloaded zip files
    #[arg(short = 'x', long)]
    pub extract: bool,

    /// Directory to extract into [default: working directory]
    #[arg(short = 'e', long = "extract_path", visible_alias = "extract-path", value_name = "DIR")]
    pub extract_path: Option<PathBuf>,

    /// Zip password (the same password is used for every archive)
    #[arg(short = 'z', long = "zip_password", visible_alias = "zip-password", value_name = "PASSWORD")]
    pub zip_password: Option<String>,

    /// Glob of files copied to --copy_destination
    #[arg(long, value_name = "GLOB", default_value = DEFAULT_COPY_PATTERN)]
    pub copy_pattern: String,

    /// Pick the first release asset whose name matches this glob
    #[arg(long, value_name = "GLOB", conflicts_with = "asset_index")]
    pub asset_pattern: Option<String>,

    /// Pick the release asset at this zero-based position
    #[arg(long, value_name = "N")]
    pub asset_index: Option<usize>,

    /// GitHub REST API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE_URL)]
    pub github_api_url: String,

    /// GitHub token for API requests (raises the rate limit)
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// HTTP connect timeout in seconds (1-300)
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub connect_timeout: u64,

    /// HTTP download timeout in seconds (1-3600)
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: u64,

    /// GitHub API connect timeout in seconds (1-300)
    #[arg(long, default_value_t = RESOLVER_CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub api_connect_timeout: u64,

    /// GitHub API request timeout in seconds (1-600)
    #[arg(long, default_value_t = RESOLVER_READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub api_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Release asset selection from `--asset-pattern` / `--asset-index`.
    pub fn asset_selection(&self) -> Result<AssetSelection, ResolveError> {
        match (&self.asset_pattern, self.asset_index) {
            (Some(pattern), _) => AssetSelection::pattern(pattern.as_str()),
            (None, Some(index)) => Ok(AssetSelection::Index(index)),
            (None, None) => Ok(AssetSelection::First),
        }
    }

    /// Options for the GitHub resolver.
    pub fn resolver_options(&self) -> Result<GithubResolverOptions, ResolveError> {
        Ok(GithubResolverOptions {
            selection: self.asset_selection()?,
            token: self.github_token.clone(),
            connect_timeout_secs: self.api_connect_timeout,
            read_timeout_secs: self.api_timeout,
        })
    }

    /// Options for the fetch pipeline.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            download_target: DownloadTarget::infer(self.download_path.clone()),
            extract: self.extract,
            extract_path: self.extract_path.clone(),
            zip_password: self.zip_password.clone(),
            copy_destination: self.copy_destination.clone(),
            copy_pattern: self.copy_pattern.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const URL: &str = "https://github.com/acme/widget";

    #[test]
    fn test_cli_minimal_args_use_defaults() {
        let args = Args::try_parse_from(["depfetch", "-u", URL]).unwrap();
        assert_eq!(args.urls, vec![URL]);
        assert!(!args.extract);
        assert_eq!(args.copy_pattern, "*.dll");
        assert_eq!(args.github_api_url, "https://api.github.com");
        assert_eq!(args.connect_timeout, 30);
        assert_eq!(args.timeout, 300);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_url_is_required() {
        let err = Args::try_parse_from(["depfetch"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_repeated_urls_keep_order() {
        let args = Args::try_parse_from([
            "depfetch",
            "-u",
            "https://a.example/1.zip",
            "-u",
            "https://b.example/2.zip",
        ])
        .unwrap();
        assert_eq!(
            args.urls,
            vec!["https://a.example/1.zip", "https://b.example/2.zip"]
        );
    }

    #[test]
    fn test_cli_underscore_and_hyphen_spellings() {
        let args = Args::try_parse_from([
            "depfetch",
            "-u",
            URL,
            "--download_path",
            "deps",
            "--extract-path",
            "out",
            "--copy_destination",
            "bin",
            "--zip-password",
            "pw",
            "-x",
        ])
        .unwrap();
        assert_eq!(args.download_path, Some(PathBuf::from("deps")));
        assert_eq!(args.extract_path, Some(PathBuf::from("out")));
        assert_eq!(args.copy_destination, Some(PathBuf::from("bin")));
        assert_eq!(args.zip_password.as_deref(), Some("pw"));
        assert!(args.extract);
    }

    #[test]
    fn test_cli_short_flags() {
        let args = Args::try_parse_from([
            "depfetch", "-u", URL, "-d", "deps", "-c", "bin", "-x", "-e", "out", "-z", "pw",
        ])
        .unwrap();
        assert_eq!(args.download_path, Some(PathBuf::from("deps")));
        assert_eq!(args.copy_destination, Some(PathBuf::from("bin")));
        assert_eq!(args.extract_path, Some(PathBuf::from("out")));
        assert_eq!(args.zip_password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_cli_asset_pattern_and_index_conflict() {
        let err = Args::try_parse_from([
            "depfetch",
            "-u",
            URL,
            "--asset-pattern",
            "*.zip",
            "--asset-index",
            "1",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_asset_selection() {
        let args = Args::try_parse_from(["depfetch", "-u", URL]).unwrap();
        assert_eq!(args.asset_selection().unwrap(), AssetSelection::First);

        let args = Args::try_parse_from(["depfetch", "-u", URL, "--asset-index", "2"]).unwrap();
        assert_eq!(args.asset_selection().unwrap(), AssetSelection::Index(2));

        let args =
            Args::try_parse_from(["depfetch", "-u", URL, "--asset-pattern", "*win64*"]).unwrap();
        assert_eq!(
            args.asset_selection().unwrap(),
            AssetSelection::Pattern("*win64*".to_string())
        );
    }

    #[test]
    fn test_cli_timeouts_are_range_checked() {
        assert!(Args::try_parse_from(["depfetch", "-u", URL, "--timeout", "0"]).is_err());
        assert!(
            Args::try_parse_from(["depfetch", "-u", URL, "--connect-timeout", "301"]).is_err()
        );
        let args = Args::try_parse_from(["depfetch", "-u", URL, "--timeout", "60"]).unwrap();
        assert_eq!(args.timeout, 60);
    }

    #[test]
    fn test_cli_api_timeouts_reach_resolver_options() {
        let args = Args::try_parse_from(["depfetch", "-u", URL]).unwrap();
        let options = args.resolver_options().unwrap();
        assert_eq!(options.connect_timeout_secs, 10);
        assert_eq!(options.read_timeout_secs, 30);

        let args = Args::try_parse_from([
            "depfetch",
            "-u",
            URL,
            "--api-connect-timeout",
            "5",
            "--api-timeout",
            "90",
        ])
        .unwrap();
        let options = args.resolver_options().unwrap();
        assert_eq!(options.connect_timeout_secs, 5);
        assert_eq!(options.read_timeout_secs, 90);

        assert!(Args::try_parse_from(["depfetch", "-u", URL, "--api-timeout", "0"]).is_err());
        assert!(
            Args::try_parse_from(["depfetch", "-u", URL, "--api-connect-timeout", "301"]).is_err()
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["depfetch", "-u", URL, "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_pipeline_options_without_download_path() {
        let args = Args::try_parse_from(["depfetch", "-u", URL]).unwrap();
        let options = args.pipeline_options();
        assert_eq!(options.download_target, DownloadTarget::WorkingDirectory);
        assert!(!options.extract);
        assert!(options.copy_destination.is_none());
    }

    #[test]
    fn test_pipeline_options_existing_directory_target() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();
        let args = Args::try_parse_from(["depfetch", "-u", URL, "-d", dir]).unwrap();
        assert_eq!(
            args.pipeline_options().download_target,
            DownloadTarget::Directory(temp.path().to_path_buf())
        );
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["depfetch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
