//! DupeScan - Content-Hash Duplicate Finder
//!
//! A cross-platform Rust CLI application for identifying duplicate files and
//! images by content digest (BLAKE3), partitioning every scanned collection
//! into unique entries and duplicate groups.

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::duplicates::{FileClassifier, ImageClassifier, ScanPipeline};
use crate::error::ExitCode;
use crate::progress::{Progress, ScanObserver};
use crate::report::TextReport;

/// Run the application with the parsed CLI arguments.
///
/// Initializes logging, installs the Ctrl+C handler, runs the scan for
/// the selected family and writes the report to stdout.
///
/// # Errors
///
/// Returns an error when a root cannot be scanned, the scan is
/// interrupted, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let handler = signal::install_handler()?;
    let shutdown_flag = handler.get_flag();

    let (args, images) = match &cli.command {
        Commands::Files(args) => (args, false),
        Commands::Images(args) => (args, true),
    };

    let observer: Arc<dyn ScanObserver> =
        Arc::new(Progress::new(cli.quiet, cli.no_color));

    let (index, stats) = if images {
        ScanPipeline::new(ImageClassifier::new())
            .with_observer(Arc::clone(&observer))
            .with_shutdown_flag(shutdown_flag)
            .scan(&args.paths, &args.exclude)?
    } else {
        ScanPipeline::new(FileClassifier::new())
            .with_observer(Arc::clone(&observer))
            .with_shutdown_flag(shutdown_flag)
            .scan(&args.paths, &args.exclude)?
    };

    log::debug!(
        "Report: {} unique, {} duplicate group(s), {} object(s) visited",
        index.unique().len(),
        index.duplicates().len(),
        stats.objects
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    TextReport::new(&index).write(&mut out, args.report_mode())?;
    out.flush()?;

    Ok(ExitCode::Success)
}
