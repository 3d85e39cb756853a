//! Scan pipeline connecting the walker to the digest index.
//!
//! # Overview
//!
//! [`ScanPipeline`] wires the pieces together: the walker discovers
//! objects on the calling thread, a classifier filters and digests them,
//! and a dedicated consumer thread folds the resulting items into a
//! [`HashIndex`]. The two sides are connected by an mpsc channel.
//!
//! Channel closure doubles as the completion signal. The producer drops
//! its sender when traversal ends (successfully or not), the consumer
//! drains whatever is still queued and only then exits, and `scan` joins
//! the consumer before reporting. No item that was sent is ever lost, and
//! no flag or poll interval is involved.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{FileClassifier, ScanPipeline};
//! use std::path::PathBuf;
//!
//! let pipeline = ScanPipeline::new(FileClassifier::new());
//! let (index, stats) = pipeline.scan(&[PathBuf::from(".")], &[])?;
//! println!(
//!     "{} unique, {} duplicate groups in {:.1}s",
//!     index.unique().len(),
//!     index.duplicates().len(),
//!     stats.elapsed.as_secs_f64()
//! );
//! # Ok::<(), dupescan::duplicates::PipelineError>(())
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::progress::ScanObserver;
use crate::scanner::{ScanError, Walker};

use super::{Classifier, HashIndex};

/// Errors that can occur while running the scan pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Traversal failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The scan was interrupted by a shutdown request.
    #[error("Scan interrupted")]
    Interrupted,

    /// The index task could not be started or did not finish cleanly.
    #[error("Index task failed: {0}")]
    Consumer(String),
}

/// Counters describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Objects the walker reported (directories included)
    pub objects: usize,
    /// Regular files among the reported objects
    pub files: usize,
    /// Items handed to the index task
    pub enqueued: usize,
    /// Items the index task folded in
    pub indexed: usize,
    /// Eligible objects whose content could not be digested
    pub failed: usize,
    /// Total bytes digested
    pub bytes_hashed: u64,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl ScanStats {
    /// Whether every enqueued item reached the index.
    #[must_use]
    pub fn drained(&self) -> bool {
        self.enqueued == self.indexed
    }

    /// Percentage of reported objects that were eligible for indexing.
    #[must_use]
    pub fn eligible_rate(&self) -> f64 {
        if self.objects == 0 {
            0.0
        } else {
            (self.enqueued as f64 / self.objects as f64) * 100.0
        }
    }
}

/// Producer/consumer pipeline for one scan family.
///
/// Generic over the [`Classifier`] so file and image scans share all of
/// the plumbing. Construction is cheap; per-run state lives on the stack
/// of [`ScanPipeline::scan`], so one pipeline can run multiple scans.
pub struct ScanPipeline<C> {
    /// Decides eligibility and builds items
    classifier: C,
    /// Optional observer notified of scan lifecycle events
    observer: Option<Arc<dyn ScanObserver>>,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<C> std::fmt::Debug for ScanPipeline<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPipeline")
            .field("classifier", &std::any::type_name::<C>())
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .field("shutdown_flag", &self.shutdown_flag)
            .finish()
    }
}

impl<C: Classifier> ScanPipeline<C> {
    /// Create a new pipeline around the given classifier.
    #[must_use]
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            observer: None,
            shutdown_flag: None,
        }
    }

    /// Attach an observer for scan lifecycle notifications.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// A set flag stops traversal early and makes [`ScanPipeline::scan`]
    /// return [`PipelineError::Interrupted`] instead of a partial index.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Run one scan over the given roots.
    ///
    /// Walks every root, hands eligible objects to the index task and
    /// waits for the task to drain completely before returning. The
    /// returned index therefore reflects every item the walk produced,
    /// and the walk outcome is only surfaced after the drain.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories or files to scan
    /// * `exclude` - Locations or gitignore-style patterns to skip
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scan`] when a root cannot be resolved or
    /// read, [`PipelineError::Interrupted`] when a shutdown request cut
    /// the scan short, and [`PipelineError::Consumer`] when the index
    /// task fails.
    pub fn scan(
        &self,
        roots: &[PathBuf],
        exclude: &[String],
    ) -> Result<(HashIndex, ScanStats), PipelineError> {
        let started = Instant::now();

        let mut walker = Walker::new(roots, exclude)?;
        if let Some(flag) = &self.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        if let Some(observer) = &self.observer {
            observer.on_scan_start();
        }
        log::info!("Scanning {} root(s)", walker.roots().len());

        let (tx, rx) = mpsc::channel();
        let consumer_observer = self.observer.clone();
        let consumer = thread::Builder::new()
            .name("dupescan-index".into())
            .spawn(move || {
                log::debug!("Index task started");
                let mut index = HashIndex::new();
                let mut indexed = 0usize;
                // recv only fails once the channel is empty and every
                // sender is gone, so the queue is always fully drained.
                while let Ok(item) = rx.recv() {
                    if let Some(observer) = &consumer_observer {
                        observer.on_item(&item);
                    }
                    index.add(item);
                    indexed += 1;
                }
                log::debug!("Index task finished after {indexed} item(s)");
                (index, indexed)
            })
            .map_err(|e| PipelineError::Consumer(e.to_string()))?;

        let mut stats = ScanStats::default();
        let walk_result = walker.walk(|object| {
            stats.objects += 1;
            if object.is_file() {
                stats.files += 1;
            }
            if let Some(observer) = &self.observer {
                observer.on_object(object.identity());
            }

            if !self.classifier.eligible(object) {
                return false;
            }

            match self.classifier.item(object) {
                Ok(item) => {
                    stats.bytes_hashed += object.size();
                    if tx.send(item).is_err() {
                        // Receiver gone means the index task died; the
                        // join below surfaces that as a Consumer error.
                        log::error!(
                            "Index task stopped early, dropping {}",
                            object.identity().display()
                        );
                        return false;
                    }
                    stats.enqueued += 1;
                    true
                }
                Err(e) => {
                    log::warn!("Cannot digest {}: {}", object.identity().display(), e);
                    stats.failed += 1;
                    false
                }
            }
        });

        // Closing the channel is the completion signal: the consumer sees
        // the drained, sender-free channel and exits. This runs on every
        // path, including walk failure, so the join below cannot hang.
        drop(tx);
        let (index, indexed) = consumer
            .join()
            .map_err(|_| PipelineError::Consumer("index task panicked".into()))?;
        stats.indexed = indexed;
        stats.elapsed = started.elapsed();

        walk_result?;

        if self.is_shutdown_requested() {
            log::info!("Scan interrupted after {} object(s)", stats.objects);
            return Err(PipelineError::Interrupted);
        }

        if let Some(observer) = &self.observer {
            observer.on_scan_end(&stats);
        }
        log::info!(
            "Scan complete: {} object(s), {} indexed ({} unique, {} duplicate group(s)) in {:.2}s",
            stats.objects,
            stats.indexed,
            index.unique().len(),
            index.duplicates().len(),
            stats.elapsed.as_secs_f64()
        );

        Ok((index, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::{FileClassifier, ImageClassifier, Item};
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn scan_files(dir: &Path) -> (HashIndex, ScanStats) {
        ScanPipeline::new(FileClassifier::new())
            .scan(&[dir.to_path_buf()], &[])
            .unwrap()
    }

    #[test]
    fn test_scan_partitions_duplicates_and_unique() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"shared content").unwrap();
        fs::write(dir.path().join("b.txt"), b"shared content").unwrap();
        fs::write(dir.path().join("c.txt"), b"lone content").unwrap();

        let (index, stats) = scan_files(dir.path());

        assert_eq!(index.unique().len(), 1);
        assert_eq!(index.duplicates().len(), 1);
        let members = index.duplicates().values().next().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(stats.files, 3);
    }

    #[test]
    fn test_scan_drains_every_enqueued_item() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            fs::write(dir.path().join(format!("f{i}.txt")), format!("content {i}")).unwrap();
        }

        let (index, stats) = scan_files(dir.path());

        assert!(stats.drained());
        assert_eq!(stats.enqueued, 20);
        assert_eq!(index.len(), 20);
    }

    #[test]
    fn test_scan_counts_directories_but_does_not_index_them() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), b"content").unwrap();

        let (index, stats) = scan_files(dir.path());

        assert_eq!(stats.objects, 2);
        assert_eq!(stats.files, 1);
        assert_eq!(index.len(), 1);
        assert!(!index.contains(&dir.path().join("sub")));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();

        let (index, stats) = scan_files(dir.path());

        assert!(index.is_empty());
        assert_eq!(stats.objects, 0);
        assert_eq!(stats.enqueued, 0);
    }

    #[test]
    fn test_scan_repeated_root_stays_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"shared").unwrap();
        fs::write(dir.path().join("b.txt"), b"shared").unwrap();

        let roots = vec![dir.path().to_path_buf(), dir.path().to_path_buf()];
        let (index, stats) = ScanPipeline::new(FileClassifier::new())
            .scan(&roots, &[])
            .unwrap();

        // Both roots report both files, but each identity counts once.
        assert_eq!(stats.enqueued, 4);
        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicates().len(), 1);
        assert!(index.unique().is_empty());
    }

    #[test]
    fn test_scan_image_family_skips_non_images() {
        let dir = TempDir::new().unwrap();
        let img = image::RgbImage::new(4, 4);
        img.save(dir.path().join("one.png")).unwrap();
        img.save(dir.path().join("two.png")).unwrap();
        fs::write(dir.path().join("fake.png"), b"not pixels").unwrap();
        fs::write(dir.path().join("notes.txt"), b"plain text").unwrap();

        let (index, stats) = ScanPipeline::new(ImageClassifier::new())
            .scan(&[dir.path().to_path_buf()], &[])
            .unwrap();

        assert_eq!(stats.files, 4);
        assert_eq!(stats.enqueued, 2);
        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicates().len(), 1);
        assert!(index.unique().is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let result = ScanPipeline::new(FileClassifier::new())
            .scan(&[PathBuf::from("/nonexistent/path/12345")], &[]);

        assert!(matches!(
            result,
            Err(PipelineError::Scan(ScanError::NotFound(_)))
        ));
    }

    #[test]
    fn test_scan_shutdown_returns_interrupted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"content").unwrap();

        let flag = Arc::new(AtomicBool::new(true));
        let result = ScanPipeline::new(FileClassifier::new())
            .with_shutdown_flag(flag)
            .scan(&[dir.path().to_path_buf()], &[]);

        assert!(matches!(result, Err(PipelineError::Interrupted)));
    }

    /// Observer that records which callbacks fired.
    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl ScanObserver for RecordingObserver {
        fn on_scan_start(&self) {
            self.events.lock().unwrap().push("start".into());
        }

        fn on_object(&self, _identity: &Path) {
            self.events.lock().unwrap().push("object".into());
        }

        fn on_item(&self, _item: &Item) {
            self.events.lock().unwrap().push("item".into());
        }

        fn on_scan_end(&self, _stats: &ScanStats) {
            self.events.lock().unwrap().push("end".into());
        }
    }

    #[test]
    fn test_observer_sees_lifecycle_events() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"content a").unwrap();
        fs::write(dir.path().join("b.txt"), b"content b").unwrap();

        let observer = Arc::new(RecordingObserver::default());
        let pipeline = ScanPipeline::new(FileClassifier::new())
            .with_observer(Arc::clone(&observer) as Arc<dyn ScanObserver>);
        pipeline.scan(&[dir.path().to_path_buf()], &[]).unwrap();

        let events = observer.events.lock().unwrap();
        assert_eq!(events.iter().filter(|e| *e == "start").count(), 1);
        assert_eq!(events.iter().filter(|e| *e == "end").count(), 1);
        assert_eq!(events.iter().filter(|e| *e == "object").count(), 2);
        assert_eq!(events.iter().filter(|e| *e == "item").count(), 2);
        assert_eq!(events.first().map(String::as_str), Some("start"));
        assert_eq!(events.last().map(String::as_str), Some("end"));
    }

    #[test]
    fn test_stats_eligible_rate() {
        let stats = ScanStats {
            objects: 10,
            enqueued: 5,
            ..Default::default()
        };
        assert!((stats.eligible_rate() - 50.0).abs() < f64::EPSILON);

        let empty = ScanStats::default();
        assert!((empty.eligible_rate() - 0.0).abs() < f64::EPSILON);
    }
}
