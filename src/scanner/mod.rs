//! Scanner module for directory traversal and content hashing.
//!
//! This module provides functionality for:
//! - Parallel directory walking using jwalk
//! - Path and pattern based exclusion via the `ignore` crate
//! - Content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and object discovery
//! - [`hasher`]: BLAKE3 content hashing (streaming and mmap)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Walker;
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from(".")];
//! let walker = Walker::new(&roots, &[])?;
//! walker.walk(|object| {
//!     println!("{}: {} bytes", object.identity().display(), object.size());
//!     object.is_file()
//! })?;
//! # Ok::<(), dupescan::scanner::ScanError>(())
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

// Re-export main types
pub use hasher::{Hasher, MMAP_THRESHOLD};
pub use walker::Walker;

/// A filesystem entry discovered during traversal.
///
/// Carries the entry's canonical identity and enough classification data
/// (file or not, size) for downstream filtering. The content digest is not
/// computed up front; callers request it via [`ScannedObject::digest`] only
/// for objects they actually want to index.
#[derive(Debug, Clone)]
pub struct ScannedObject {
    /// Canonical path identifying this object
    path: PathBuf,
    /// Whether the object is a regular file (symlinks are not followed)
    is_file: bool,
    /// Size in bytes; zero for non-files
    size: u64,
    /// Shared hasher used for on-demand digests
    hasher: Arc<Hasher>,
}

impl ScannedObject {
    /// Create a new scanned object.
    ///
    /// # Arguments
    ///
    /// * `path` - Canonical path of the object
    /// * `is_file` - Whether the object is a regular file
    /// * `size` - Size in bytes (zero for non-files)
    /// * `hasher` - Shared hasher for digest computation
    #[must_use]
    pub fn new(path: PathBuf, is_file: bool, size: u64, hasher: Arc<Hasher>) -> Self {
        Self {
            path,
            is_file,
            size,
            hasher,
        }
    }

    /// The canonical path identifying this object.
    #[must_use]
    pub fn identity(&self) -> &Path {
        &self.path
    }

    /// Whether this object is a regular file.
    ///
    /// Directories, symlinks, sockets and other special entries report
    /// `false` and are never hashed.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.is_file
    }

    /// Size of the object in bytes. Zero for non-files.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Compute the content digest of this object.
    ///
    /// Reads the file from disk on every call; callers are expected to
    /// invoke this at most once per object.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the content cannot be read, including when
    /// the object is not a regular file.
    pub fn digest(&self) -> Result<String, HashError> {
        self.hasher.digest_file(&self.path)
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An exclude pattern could not be parsed.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern as given on the command line
        pattern: String,
        /// The underlying parse error
        #[source]
        source: ignore::Error,
    },

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during content hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
