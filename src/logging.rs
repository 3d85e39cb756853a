//! Logging setup for DupeScan.
//!
//! Built on the `log` facade with an `env_logger` backend. All log output
//! goes to stderr so the report on stdout stays clean for piping.
//!
//! The effective level comes from, in order of precedence:
//!
//! 1. `RUST_LOG`, when set (full env_logger filter syntax)
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Info, the default
//!
//! Debug builds log with timestamps; release builds keep the lines short.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupescan::logging::init_logging;
//!
//! // -v on the command line
//! init_logging(1, false);
//! ```

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initialize the logging subsystem from the CLI verbosity flags.
///
/// Call once at startup, before anything logs. `RUST_LOG` overrides the
/// flags when present.
///
/// # Arguments
///
/// * `verbose` - Count of `-v` flags (0 = info, 1 = debug, 2+ = trace)
/// * `quiet` - Show errors only
///
/// # Panics
///
/// Panics when called twice; the `log` facade accepts one backend per
/// process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let fallback = level_filter(verbose, quiet);

    let mut builder = Builder::from_env(Env::default().default_filter_or(fallback.as_str()));
    apply_format(&mut builder, verbose);
    builder.init();

    log::debug!("Logging ready, fallback level {fallback}");
}

/// Level selected by the CLI flags alone.
fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Install the line format matching the build type.
fn apply_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    builder.format(move |buf, record| {
        let ts = buf.timestamp_millis();
        let style = buf.default_level_style(record.level());
        if verbose >= 1 {
            writeln!(
                buf,
                "{ts} {style}{:<5}{style:#} {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{ts} {style}{:<5}{style:#} {}",
                record.level(),
                record.args()
            )
        }
    });

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{:<5}{style:#} {}",
                record.level(),
                record.args()
            )
        });
    }
}
