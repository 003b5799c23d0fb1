//! CLI entry point for the dependency fetcher.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use depfetch_core::{GithubResolver, HttpClient, Pipeline};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;

/// Exit status for any failed run (a shell reports `exit(-1)` as 255).
const FAILURE_EXIT_CODE: u8 = 255;

/// HTTP-stack crates capped at `warn` unless `RUST_LOG` is set.
const QUIET_HTTP_DIRECTIVES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,h2=warn";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    init_tracing(&args);

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

/// Installs the fmt subscriber on stderr.
///
/// Priority: `RUST_LOG` > `-q` > `-v` count > info.
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.quiet {
            EnvFilter::new(default_level)
        } else {
            EnvFilter::new(format!("{default_level},{QUIET_HTTP_DIRECTIVES}"))
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let client = HttpClient::new_with_timeouts(args.connect_timeout, args.timeout)
        .context("failed to build download client")?;
    let resolver = GithubResolver::with_base_url(&args.github_api_url, args.resolver_options()?)
        .context("failed to build GitHub resolver")?;

    let pipeline = Pipeline::new(client, Box::new(resolver), args.pipeline_options());
    info!(urls = args.urls.len(), "depfetch starting");

    let report = pipeline.run(&args.urls).await?;
    for processed in &report.processed {
        info!(
            url = %processed.url,
            path = %processed.download.path.display(),
            bytes = processed.download.bytes_written,
            extracted = processed.extracted.as_ref().map(|s| s.files),
            copied = processed.copied,
            "done"
        );
    }
    info!(processed = report.processed.len(), "all dependencies fetched");
    Ok(())
}
