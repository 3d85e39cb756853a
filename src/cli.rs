//! Command-line interface definitions for DupeScan.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! one subcommand per scan family.
//!
//! # Example
//!
//! ```bash
//! # Find duplicate files under two directories
//! dupescan files ~/Documents ~/Backup
//!
//! # Find duplicate images, skipping a cache directory
//! dupescan images ~/Pictures --exclude ~/Pictures/.thumbnails
//!
//! # Only print the duplicate groups
//! dupescan files ~/Downloads --duplicates
//!
//! # Verbose mode for debugging
//! dupescan -v files ~/Downloads
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::report::ReportMode;

/// Content-hash duplicate finder for files and images.
///
/// DupeScan walks the given locations, digests eligible objects with
/// BLAKE3 and reports which contents are unique and which appear in
/// more than one place.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for DupeScan.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare files by content
    Files(ScanArgs),
    /// Compare images by content, detected from file headers
    Images(ScanArgs),
}

/// Arguments shared by the scan subcommands.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Objects to scan (directories or files)
    #[arg(value_name = "OBJ", required = true)]
    pub paths: Vec<PathBuf>,

    /// Objects or gitignore-style patterns to exclude
    ///
    /// An exclude naming an existing location skips that location and
    /// everything under it; anything else is matched as a pattern.
    #[arg(long, value_name = "OBJ")]
    pub exclude: Vec<String>,

    /// Only list unique entries
    #[arg(long, conflicts_with = "duplicates")]
    pub unique: bool,

    /// Only list duplicate groups
    #[arg(long)]
    pub duplicates: bool,
}

impl ScanArgs {
    /// Report sections selected by the action flags.
    #[must_use]
    pub fn report_mode(&self) -> ReportMode {
        if self.unique {
            ReportMode::UniqueOnly
        } else if self.duplicates {
            ReportMode::DuplicatesOnly
        } else {
            ReportMode::All
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files_subcommand() {
        let cli = Cli::try_parse_from(["dupescan", "files", "/data"]).unwrap();

        match cli.command {
            Commands::Files(args) => {
                assert_eq!(args.paths, vec![PathBuf::from("/data")]);
                assert!(args.exclude.is_empty());
                assert!(!args.unique);
                assert!(!args.duplicates);
            }
            Commands::Images(_) => panic!("Expected files subcommand"),
        }
    }

    #[test]
    fn test_parse_images_subcommand() {
        let cli = Cli::try_parse_from(["dupescan", "images", "/photos"]).unwrap();

        assert!(matches!(cli.command, Commands::Images(_)));
    }

    #[test]
    fn test_parse_multiple_paths_and_excludes() {
        let cli = Cli::try_parse_from([
            "dupescan",
            "files",
            "/a",
            "/b",
            "--exclude",
            "/a/skip",
            "--exclude",
            "*.tmp",
        ])
        .unwrap();

        match cli.command {
            Commands::Files(args) => {
                assert_eq!(args.paths.len(), 2);
                assert_eq!(args.exclude, vec!["/a/skip".to_string(), "*.tmp".to_string()]);
            }
            Commands::Images(_) => panic!("Expected files subcommand"),
        }
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Cli::try_parse_from(["dupescan", "files"]).is_err());
    }

    #[test]
    fn test_unique_and_duplicates_conflict() {
        let result =
            Cli::try_parse_from(["dupescan", "files", "/data", "--unique", "--duplicates"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["dupescan", "-v", "-q", "files", "/data"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dupescan", "files", "/data", "-vv"]).unwrap();

        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_report_mode_mapping() {
        let all = Cli::try_parse_from(["dupescan", "files", "/d"]).unwrap();
        let unique = Cli::try_parse_from(["dupescan", "files", "/d", "--unique"]).unwrap();
        let dupes = Cli::try_parse_from(["dupescan", "files", "/d", "--duplicates"]).unwrap();

        let mode = |cli: Cli| match cli.command {
            Commands::Files(args) | Commands::Images(args) => args.report_mode(),
        };

        assert_eq!(mode(all), ReportMode::All);
        assert_eq!(mode(unique), ReportMode::UniqueOnly);
        assert_eq!(mode(dupes), ReportMode::DuplicatesOnly);
    }
}
