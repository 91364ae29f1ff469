use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use dupscan::prelude::*;

#[derive(Parser)]
#[command(name = "dupscan")]
#[command(about = "Find files with identical content using SHA-256 digests", long_about = None)]
struct Cli {
    /// Directory to scan recursively
    directory: PathBuf,

    /// Ignore files smaller than this many bytes
    #[arg(short, long, default_value_t = 1)]
    min_size: u64,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Set up graceful shutdown handler
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown_requested.clone();

    ctrlc::set_handler(move || {
        tracing::warn!("shutdown requested, stopping after the current file");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let scanner = Scanner::new(cli.min_size);
    tracing::info!(
        directory = %cli.directory.display(),
        min_size = scanner.min_size(),
        "scanning"
    );

    let scan = scanner
        .scan_with_cancel(&cli.directory, &shutdown_requested)
        .with_context(|| format!("Failed to scan {}", cli.directory.display()))?;

    tracing::info!(
        files = scan.files().len(),
        errors = scan.errors().len(),
        bytes = %format_bytes(scan.total_bytes()),
        "scan complete"
    );

    let candidates = candidate_count(&group_by_size(&scan));
    let progress = if cli.batch || candidates == 0 {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(candidates as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")?
                .progress_chars("#>-"),
        );
        pb
    };

    let duplicates = find_duplicates(&scan, &shutdown_requested, |_| progress.inc(1));

    if duplicates.interrupted {
        progress.abandon_with_message("interrupted");
    } else {
        progress.finish_and_clear();
    }

    tracing::info!(
        groups = duplicates.groups.len(),
        reclaimable = %format_bytes(duplicates.wasted_bytes()),
        "duplicate detection complete"
    );

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create report file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if cli.json {
        write_json_report(&mut out, scanner.config(), &scan, Some(&duplicates))?;
    } else {
        write_report(&mut out, &scan, Some(&duplicates))?;
    }
    out.flush().context("Failed to write report")?;

    if let Some(path) = &cli.output {
        tracing::info!(path = %path.display(), "report saved");
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
