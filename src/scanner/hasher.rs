//! BLAKE3 content hashing.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content digests
//! of files on disk. Digests are rendered as lowercase hex strings so they
//! can key hash maps and appear directly in report output.
//!
//! # Strategy
//!
//! - Small files are hashed through a streaming read, which avoids mapping
//!   overhead and works on every filesystem.
//! - Files at or above [`MMAP_THRESHOLD`] use BLAKE3's memory-mapped,
//!   rayon-parallel update, which scales across cores for large inputs.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.digest_file(Path::new("photo.png"))?;
//! println!("{digest}");
//! # Ok::<(), dupescan::scanner::HashError>(())
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use super::HashError;

/// Files at or above this size are hashed via memory mapping with rayon.
///
/// Below the threshold the mapping setup costs more than it saves, so a
/// plain streaming read wins.
pub const MMAP_THRESHOLD: u64 = 16 * 1024 * 1024;

/// Content hasher backed by BLAKE3.
///
/// Stateless and cheap to copy; wrap it in an `Arc` when sharing across
/// threads to keep call sites uniform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher;

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute the BLAKE3 digest of a file's full content.
    ///
    /// Returns the digest as a lowercase hex string. Empty files hash to
    /// the (stable) BLAKE3 digest of zero bytes, so they still participate
    /// in duplicate grouping.
    ///
    /// # Arguments
    ///
    /// * `path` - File to hash
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read. The
    /// error distinguishes missing files and permission problems from
    /// other I/O failures.
    pub fn digest_file(&self, path: &Path) -> Result<String, HashError> {
        let file = File::open(path).map_err(|e| classify_io_error(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| classify_io_error(path, e))?
            .len();

        let mut hasher = blake3::Hasher::new();
        if len >= MMAP_THRESHOLD {
            log::trace!("Hashing via mmap ({} bytes): {}", len, path.display());
            drop(file);
            hasher
                .update_mmap_rayon(path)
                .map_err(|e| classify_io_error(path, e))?;
        } else {
            let mut reader = file;
            io::copy(&mut reader, &mut hasher).map_err(|e| classify_io_error(path, e))?;
        }

        Ok(hasher.finalize().to_hex().to_string())
    }
}

/// Map an I/O error to a [`HashError`], preserving the failing path.
fn classify_io_error(path: &Path, error: io::Error) -> HashError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
