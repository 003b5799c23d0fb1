//! Extract an archive with 7-Zip.
//!
//! Exits with the archiver's own exit code, or 255 when the archiver could not
//! be run at all.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use depfetch_core::archive::DEFAULT_PROGRAM;
use depfetch_core::{ExtractMethod, SevenZipJob};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const FAILURE_EXIT_CODE: u8 = 255;

/// Extract archive using 7zip.
#[derive(Parser, Debug)]
#[command(name = "extract-archive")]
#[command(author, version, about = "Extract archive using 7zip.")]
struct Args {
    /// The archive file to extract (a directory means its newest file)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory to extract into [default: the archive's directory]
    #[arg(short = 'o', long = "output_path", visible_alias = "output-path", value_name = "DIR")]
    output_path: Option<PathBuf>,

    /// Archive password
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// File filter to extract exclusively (repeatable) [default: all files]
    #[arg(short = 'e', value_name = "FILTER")]
    extensions: Vec<String>,

    /// Path to the 7-Zip program [default: 7z from PATH]
    #[arg(short = 'z', long = "program_path", visible_alias = "program-path", value_name = "PATH")]
    program_path: Option<PathBuf>,

    /// 7-Zip extraction method: 'e' (flat) or 'x' (full paths)
    #[arg(short = 'x', long = "extract_method", visible_alias = "extract-method", default_value_t = ExtractMethod::FullPaths)]
    extract_method: ExtractMethod,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    if let Some(output) = &args.output_path
        && !output.is_dir()
    {
        bail!(
            "output path '{}' either doesn't exist or is not a directory",
            output.display()
        );
    }
    if let Some(program) = &args.program_path
        && !program.is_file()
    {
        bail!(
            "program path '{}' either doesn't exist or is not a file",
            program.display()
        );
    }

    let job = SevenZipJob {
        output: args.output_path,
        password: args.password,
        extensions: args.extensions,
        program: args
            .program_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
        method: args.extract_method,
        ..SevenZipJob::new(args.input)
    };

    let output = job.run().await?;
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }

    if output.exit_code == 0 {
        info!(exit_code = output.exit_code, "7z success");
    } else {
        error!(exit_code = output.exit_code, "7z reported an error");
    }
    Ok(ExitCode::from(
        u8::try_from(output.exit_code).unwrap_or(FAILURE_EXIT_CODE),
    ))
}
