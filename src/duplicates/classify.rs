//! Object classifiers for the scan families.
//!
//! # Overview
//!
//! A [`Classifier`] decides which discovered objects participate in
//! duplicate detection and turns the eligible ones into [`Item`]s. The
//! two shipped classifiers cover the scan families exposed on the CLI:
//!
//! - [`FileClassifier`]: every regular file
//! - [`ImageClassifier`]: regular files whose leading bytes identify a
//!   known image format, regardless of file extension
//!
//! Eligibility is checked before any content hashing happens, so scans
//! never pay for hashing objects the classifier rejects.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::scanner::{HashError, ScannedObject};

use super::Item;

/// How many leading bytes the image sniffer reads.
///
/// Every format recognized by the `image` crate declares its magic number
/// within this window.
pub const SNIFF_LEN: usize = 64;

/// Capability check and item construction for one scan family.
///
/// Implementors decide eligibility from cheap object metadata (and at most
/// a short header read); [`Classifier::item`] then derives the digest for
/// objects that passed. Calling `item` on an ineligible object is a
/// contract violation and may return an error or a meaningless digest.
pub trait Classifier {
    /// Whether this object participates in duplicate detection.
    fn eligible(&self, object: &ScannedObject) -> bool;

    /// Build the index item for an eligible object.
    ///
    /// The default implementation pairs the object's identity with its
    /// content digest, computed here and nowhere else.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the object's content cannot be read.
    fn item(&self, object: &ScannedObject) -> Result<Item, HashError> {
        let digest = object.digest()?;
        Ok(Item::new(object.identity().to_path_buf(), digest))
    }
}

/// Classifier accepting every regular file, empty files included.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileClassifier;

impl FileClassifier {
    /// Create a new file classifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for FileClassifier {
    fn eligible(&self, object: &ScannedObject) -> bool {
        object.is_file()
    }
}

/// Classifier accepting regular files that carry an image header.
///
/// Detection is content based: a text file renamed to `.png` is rejected,
/// a real image without any extension is accepted. Files that cannot be
/// read are silently ineligible; the scan moves on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageClassifier;

impl ImageClassifier {
    /// Create a new image classifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for ImageClassifier {
    fn eligible(&self, object: &ScannedObject) -> bool {
        object.is_file() && has_image_header(object.identity())
    }
}

/// Sniff the leading bytes of a file for a known image magic number.
fn has_image_header(path: &Path) -> bool {
    let mut header = Vec::with_capacity(SNIFF_LEN);
    let read = File::open(path).and_then(|f| {
        let mut reader = f.take(SNIFF_LEN as u64);
        reader.read_to_end(&mut header)
    });

    match read {
        Ok(_) => image::guess_format(&header).is_ok(),
        Err(e) => {
            log::trace!("Cannot sniff {}: {}", path.display(), e);
            false
        }
    }
}
