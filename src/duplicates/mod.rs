//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Folding classified items into a digest index ([`HashIndex`])
//! - Deciding which objects participate per scan family ([`Classifier`])
//! - Running the producer/consumer scan pipeline ([`ScanPipeline`])

pub mod classify;
pub mod index;
pub mod pipeline;

// Re-export main types
pub use classify::{Classifier, FileClassifier, ImageClassifier, SNIFF_LEN};
pub use index::{HashIndex, Item};
pub use pipeline::{PipelineError, ScanPipeline, ScanStats};
