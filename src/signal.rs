//! Ctrl+C handling for graceful scan termination.
//!
//! The process-wide hook flips a shared `AtomicBool`. The walker checks
//! the flag between entries and stops producing, the pipeline drains what
//! is already queued and surfaces the interrupt as an error, and main maps
//! that error to exit code 130.
//!
//! ```rust,no_run
//! use dupescan::signal::install_handler;
//!
//! let handler = install_handler()?;
//! let flag = handler.get_flag();
//! // hand `flag` to ScanPipeline::with_shutdown_flag
//! # Ok::<(), dupescan::signal::SignalError>(())
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown state, cheap to clone across threads.
///
/// All clones observe the same flag; `Send` and `Sync` come for free from
/// the `Arc<AtomicBool>` inside.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler whose flag starts unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request shutdown without an actual signal.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The raw flag, for handing to the walker and pipeline.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag. Used when the process-wide handler is reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// The Ctrl+C hook could not be registered.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the Ctrl+C hook and return the process-wide handler.
///
/// The hook can only be registered once per process, so repeated calls
/// (and parallel tests) get the already installed handler back with its
/// flag cleared.
///
/// # Errors
///
/// Currently infallible in practice: when the hook cannot be registered,
/// for instance because some other component owns it, the handler still
/// works through [`ShutdownHandler::request_shutdown`].
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(existing) = GLOBAL_HANDLER.get() {
        existing.reset();
        return Ok(existing.clone());
    }

    // The init closure runs at most once; racing first calls block here
    // and all receive the handler whose flag the hook captured.
    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();
        let hooked = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);

            // The spinner shares stderr; write the notice past it and flush.
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\nInterrupted, finishing in-flight work...");
            let _ = stderr.flush();

            log::info!("Shutdown requested via signal");
        });

        if let Err(e) = hooked {
            log::debug!("Ctrl+C hook unavailable: {e}");
        }

        handler
    });

    Ok(handler.clone())
}
