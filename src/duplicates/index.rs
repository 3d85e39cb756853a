//! Digest index with unique/duplicate partitioning.
//!
//! # Overview
//!
//! This module provides [`HashIndex`], the accumulator at the heart of
//! duplicate detection. Items are folded in one at a time; at any point
//! the index partitions every accepted identity into two views:
//!
//! - **unique**: digests seen on exactly one identity so far
//! - **duplicates**: digests seen on two or more identities, with the full
//!   member set for each
//!
//! The index is insertion-order independent: feeding the same items in any
//! order produces the same final partition. Re-adding an identity that was
//! already accepted is a no-op, which makes the whole structure safe to
//! drive from retried or overlapping scans.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::{HashIndex, Item};
//! use std::path::PathBuf;
//!
//! let mut index = HashIndex::new();
//! index.add(Item::new(PathBuf::from("/a"), "d1".to_string()));
//! index.add(Item::new(PathBuf::from("/b"), "d1".to_string()));
//! index.add(Item::new(PathBuf::from("/c"), "d2".to_string()));
//!
//! assert_eq!(index.unique().len(), 1);
//! assert_eq!(index.duplicates().len(), 1);
//! assert_eq!(index.duplicates()["d1"].len(), 2);
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A classified object ready for indexing.
///
/// Pairs an identity (canonical path) with its content digest. Items are
/// plain values; equality of digests is what drives duplicate grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Canonical path identifying the object
    pub identity: PathBuf,
    /// Lowercase hex content digest
    pub digest: String,
}

impl Item {
    /// Create a new item.
    ///
    /// # Arguments
    ///
    /// * `identity` - Canonical path of the object
    /// * `digest` - Content digest of the object
    #[must_use]
    pub fn new(identity: PathBuf, digest: String) -> Self {
        debug_assert!(!identity.as_os_str().is_empty(), "identity must be non-empty");
        debug_assert!(!digest.is_empty(), "digest must be non-empty");
        Self { identity, digest }
    }
}

/// Accumulator that partitions identities into unique and duplicate sets.
///
/// Internally keyed by digest. The first identity carrying a digest lands
/// in the unique view; the second promotes the digest to a duplicate group
/// containing both; later identities join the existing group. An identity
/// is only ever counted once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HashIndex {
    /// Identities already accepted (idempotence guard)
    seen: HashSet<PathBuf>,
    /// Digest -> sole identity carrying it
    unique: HashMap<String, PathBuf>,
    /// Digest -> all identities carrying it (two or more)
    duplicates: HashMap<String, BTreeSet<PathBuf>>,
}

impl HashIndex {
    /// Create a new, empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one item into the index.
    ///
    /// Adding an identity that was already accepted is a no-op, regardless
    /// of the digest it carries this time. Otherwise the item's digest
    /// decides its placement: unseen digests go to the unique view, a
    /// second sighting promotes the digest to a duplicate group, and later
    /// sightings join that group.
    pub fn add(&mut self, item: Item) {
        let Item { identity, digest } = item;

        if !self.seen.insert(identity.clone()) {
            log::trace!("Already indexed, ignoring: {}", identity.display());
            return;
        }

        if let Some(first) = self.unique.remove(&digest) {
            // Second identity with this digest: promote to a group.
            log::debug!(
                "Duplicate content found: {} matches {}",
                identity.display(),
                first.display()
            );
            self.duplicates
                .insert(digest, BTreeSet::from([first, identity]));
        } else if let Some(members) = self.duplicates.get_mut(&digest) {
            log::debug!("Duplicate content found: {}", identity.display());
            members.insert(identity);
        } else {
            self.unique.insert(digest, identity);
        }
    }

    /// Digests carried by exactly one accepted identity.
    #[must_use]
    pub fn unique(&self) -> &HashMap<String, PathBuf> {
        &self.unique
    }

    /// Digests carried by two or more accepted identities.
    #[must_use]
    pub fn duplicates(&self) -> &HashMap<String, BTreeSet<PathBuf>> {
        &self.duplicates
    }

    /// Whether an identity has already been accepted.
    #[must_use]
    pub fn contains(&self, identity: &Path) -> bool {
        self.seen.contains(identity)
    }

    /// Number of accepted identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the index has accepted no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
