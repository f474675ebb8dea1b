//! tcopy - Tree Copy
//!
//! Copy a file, directory or symlink with explicit overwrite rules, powered
//! by treecopy.

use clap::{Parser, ValueEnum};
use serde_json::{Value, json};
use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use treecopy::{CopyOptions, CopyStats, Error as TreecopyError, copy, copy_sync};

/// tcopy - Copy files, directories and symlinks
///
/// The copy is created at exactly DEST. Existing entries at DEST are an
/// error unless --overwrite is given; a directory never replaces a file or
/// the other way around. Symlinks are copied as symlinks.
///
/// Usage:
///   tcopy SOURCE DEST
#[derive(Parser, Debug)]
#[command(name = "tcopy", version, about, long_about = None)]
struct Args {
    /// Source file, directory or symlink
    source: PathBuf,

    /// Destination path
    dest: PathBuf,

    /// Replace existing destination entries
    #[arg(short = 'f', long)]
    overwrite: bool,

    /// Preserve access and modification times
    #[arg(short = 'p', long)]
    preserve_timestamps: bool,

    /// Do not call fsync after each file (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// IO mode
    #[arg(long, value_enum, default_value = "blocking")]
    io: IoMode,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Verbose output (debug logging on stderr)
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IoMode {
    /// Blocking std::fs calls on the main thread
    Blocking,
    /// tokio::fs on an async runtime
    Async,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Human-readable summary
    Human,
    /// One JSON object on stdout
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Copy(#[from] TreecopyError),

    #[error("Failed to start async runtime: {source}")]
    Runtime { source: io::Error },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Copy(error) => error.code().as_str(),
            Self::Runtime { .. } | Self::JsonSerialize { .. } => "internal",
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Copy(error) if error.code().is_invalid_input() => 2,
            _ => 1,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = run(&args).and_then(|stats| report_success(&args, &stats));
    if let Err(error) = result {
        report_failure(&args, &error);
        std::process::exit(error.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_options(args: &Args) -> CopyOptions {
    let mut options = CopyOptions::default();
    if args.overwrite {
        options = options.with_overwrite();
    }
    if args.preserve_timestamps {
        options = options.with_preserve_timestamps();
    }
    if args.no_sync {
        options = options.without_fsync();
    }
    options
}

fn run(args: &Args) -> CliResult<CopyStats> {
    let options = build_options(args);
    tracing::debug!(?options, io = ?args.io, "starting copy");

    let stats = match args.io {
        IoMode::Blocking => copy_sync(&args.source, &args.dest, &options)?,
        IoMode::Async => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|source| CliError::Runtime { source })?;
            runtime.block_on(copy(&args.source, &args.dest, &options))?
        }
    };

    Ok(stats)
}

fn report_success(args: &Args, stats: &CopyStats) -> CliResult<()> {
    match args.output {
        OutputMode::Human => {
            print_stats(stats, args.verbose);
            Ok(())
        }
        OutputMode::Json => print_json_value(&json!({
            "source": display_path(&args.source),
            "destination": display_path(&args.dest),
            "outcome": "copied",
            "files_copied": stats.files_copied,
            "symlinks_copied": stats.symlinks_copied,
            "dirs_created": stats.dirs_created,
            "entries_replaced": stats.entries_replaced,
            "bytes_copied": stats.bytes_copied,
            "duration_ms": stats.duration.as_millis() as u64,
        })),
    }
}

fn report_failure(args: &Args, error: &CliError) {
    if args.output == OutputMode::Json && !matches!(error, CliError::JsonSerialize { .. }) {
        let payload = json!({
            "source": display_path(&args.source),
            "destination": display_path(&args.dest),
            "outcome": "failed",
            "error_code": error.code(),
            "error_message": error.to_string(),
        });
        if print_json_value(&payload).is_ok() {
            return;
        }
    }
    eprintln!("error[{}]: {}", error.code(), error);
}

fn print_stats(stats: &CopyStats, verbose: bool) {
    let mut parts = Vec::new();
    if stats.files_copied > 0 {
        parts.push(format!("{} files", stats.files_copied));
    }
    if stats.symlinks_copied > 0 {
        parts.push(format!("{} symlinks", stats.symlinks_copied));
    }
    if stats.dirs_created > 0 {
        parts.push(format!("{} dirs", stats.dirs_created));
    }

    if parts.is_empty() {
        println!("Done");
    } else {
        println!(
            "Copied {} ({})",
            parts.join(", "),
            format_bytes(stats.bytes_copied)
        );
    }

    if verbose {
        if stats.entries_replaced > 0 {
            println!("Replaced {} existing entries", stats.entries_replaced);
        }
        println!("Took {:.2?}", stats.duration);
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
