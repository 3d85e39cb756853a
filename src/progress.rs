//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ScanObserver`] trait, the pipeline's window
//! to the outside world, and the [`Progress`] struct which implements it
//! to display a live spinner in the terminal.
//!
//! # Plain Mode
//!
//! When plain mode is enabled (for dumb terminals or `NO_COLOR`), the
//! spinner drops color and animation:
//! - No spinner glyphs, just text
//! - Reduced update frequency

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::duplicates::{Item, ScanStats};

/// Observer for scan lifecycle events.
///
/// An implementation is injected into the pipeline at construction time;
/// the pipeline itself never talks to a terminal. Methods may be called
/// from different threads: discovery events fire on the walking thread,
/// [`ScanObserver::on_item`] fires on the index thread.
pub trait ScanObserver: Send + Sync {
    /// Called once when a scan begins.
    fn on_scan_start(&self);

    /// Called for every object the walker reports.
    ///
    /// # Arguments
    ///
    /// * `identity` - Canonical path of the discovered object
    fn on_object(&self, identity: &Path);

    /// Called for each item just before it is folded into the index.
    fn on_item(&self, _item: &Item) {}

    /// Called once when a scan completes successfully.
    ///
    /// Not called on error paths; the spinner is simply dropped there.
    ///
    /// # Arguments
    ///
    /// * `stats` - Counters for the finished run
    fn on_scan_end(&self, stats: &ScanStats);
}

/// Progress reporter using indicatif.
///
/// Shows a single spinner that counts discovered objects and displays the
/// path currently being examined.
pub struct Progress {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
    plain: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress is displayed.
    /// * `plain` - If true, drops color and spinner animation.
    #[must_use]
    pub fn new(quiet: bool, plain: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet,
            plain,
        }
    }

    /// Create the spinner style for scanning.
    fn spinner_style(&self) -> ProgressStyle {
        if self.plain {
            ProgressStyle::with_template("{msg} [{elapsed_precise}] {pos} objects")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        } else {
            ProgressStyle::with_template(
                "{spinner:.green} {msg} [{elapsed_precise}] {pos} objects",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        }
    }
}

impl ScanObserver for Progress {
    fn on_scan_start(&self) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(self.spinner_style());
        pb.set_message("Scanning");
        // In plain mode, use a slower tick rate
        let tick_rate = if self.plain { 500 } else { 100 };
        pb.enable_steady_tick(Duration::from_millis(tick_rate));

        let mut spinner = self.spinner.lock().unwrap();
        *spinner = Some(pb);
    }

    fn on_object(&self, identity: &Path) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *self.spinner.lock().unwrap() {
            pb.inc(1);
            pb.set_message(truncate_path(&identity.to_string_lossy(), 30));
        }
    }

    fn on_scan_end(&self, stats: &ScanStats) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.spinner.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "Scanned {} objects ({} indexed)",
                stats.objects, stats.indexed
            ));
        }
    }
}

/// Truncate a path for display next to the spinner.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let path_buf = std::path::Path::new(path);
    let file_name = path_buf
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        // The cut may land inside a multibyte character; move it forward
        // to the next boundary.
        let cut = file_name.len() - max_len + 3;
        let start = file_name
            .char_indices()
            .map(|(idx, _)| idx)
            .find(|&idx| idx >= cut)
            .unwrap_or(file_name.len());
        return format!("...{}", &file_name[start..]);
    }

    format!(".../{}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_path_unchanged() {
        assert_eq!(truncate_path("/tmp/a.txt", 30), "/tmp/a.txt");
    }

    #[test]
    fn test_truncate_long_path_keeps_file_name() {
        let shown = truncate_path("/very/long/directory/chain/name.txt", 30);
        assert_eq!(shown, ".../name.txt");
    }

    #[test]
    fn test_truncate_long_file_name_keeps_tail() {
        let shown = truncate_path("/tmp/an_unreasonably_long_file_name_for_a_spinner.txt", 30);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with(".txt"));
        assert!(shown.len() <= 30);
    }

    #[test]
    fn test_truncate_emoji_name_lands_on_char_boundary() {
        // 36 bytes of file name; the naive cut at byte 9 falls inside
        // the third glyph.
        let shown = truncate_path("/p/😀😀😀😀😀😀😀😀.png", 30);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with(".png"));
        assert!(shown.len() <= 30);
    }

    #[test]
    fn test_truncate_cjk_name_lands_on_char_boundary() {
        let shown = truncate_path("/p/日本語のとても長いファイル名です.jpg", 30);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with(".jpg"));
        assert!(shown.len() <= 30);
    }

    #[test]
    fn test_observer_survives_multibyte_names() {
        let progress = Progress::new(false, true);
        progress.on_scan_start();
        progress.on_object(Path::new("/p/😀😀😀😀😀😀😀😀.png"));
        progress.on_scan_end(&ScanStats::default());
    }
}
