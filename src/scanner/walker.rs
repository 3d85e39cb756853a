//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one or more
//! scan roots and handing every discovered filesystem object to a caller
//! supplied handler. It uses [`jwalk`] for parallel directory walking
//! (4x faster than walkdir).
//!
//! # Behavior
//!
//! - Roots are canonicalized up front; a missing or unreadable root aborts
//!   the walk with an error.
//! - Every entry below a root is reported exactly once, directories
//!   included. Classification (file vs other) travels with the object.
//! - Hidden entries are reported like any other; symlinks are reported
//!   but never followed.
//! - Excludes that name an existing location skip that location and
//!   everything under it. Anything else is treated as a gitignore-style
//!   pattern anchored at each root.
//! - Errors on individual entries are logged as warnings and skipped; the
//!   walk itself keeps going.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Walker;
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/home/user/Pictures")];
//! let walker = Walker::new(&roots, &["*.tmp".to_string()])?;
//! let mut files = 0;
//! walker.walk(|object| {
//!     if object.is_file() {
//!         files += 1;
//!     }
//!     object.is_file()
//! })?;
//! println!("Found {files} files");
//! # Ok::<(), dupescan::scanner::ScanError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{Hasher, ScanError, ScannedObject};

/// Directory walker for multi-root object discovery.
///
/// Resolves roots and exclusion rules at construction time so that user
/// input errors surface before any traversal work starts.
#[derive(Debug)]
pub struct Walker {
    /// Canonicalized scan roots, in the order given
    roots: Vec<PathBuf>,
    /// Canonicalized exclude locations (prefix matched)
    exclude_paths: Vec<PathBuf>,
    /// Raw gitignore-style exclude patterns (validated, anchored per root)
    exclude_patterns: Vec<String>,
    /// Shared hasher handed to every emitted object
    hasher: Arc<Hasher>,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given roots and exclusion rules.
    ///
    /// Each root is canonicalized; each exclude is either resolved to an
    /// existing location (excluded by prefix) or kept as a gitignore-style
    /// pattern (matched relative to each root).
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories or files to scan
    /// * `exclude` - Locations or patterns to skip
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] or [`ScanError::PermissionDenied`]
    /// when a root cannot be resolved, and [`ScanError::Pattern`] when an
    /// exclude pattern fails to parse.
    pub fn new(roots: &[PathBuf], exclude: &[String]) -> Result<Self, ScanError> {
        let roots = roots
            .iter()
            .map(|root| {
                root.canonicalize()
                    .map_err(|e| resolve_error(root, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut exclude_paths = Vec::new();
        let mut exclude_patterns = Vec::new();
        for entry in exclude {
            match Path::new(entry).canonicalize() {
                Ok(resolved) => {
                    log::debug!("Excluding location: {}", resolved.display());
                    exclude_paths.push(resolved);
                }
                Err(_) => {
                    log::debug!("Excluding pattern: {entry}");
                    exclude_patterns.push(entry.clone());
                }
            }
        }
        validate_patterns(&exclude_patterns)?;

        Ok(Self {
            roots,
            exclude_paths,
            exclude_patterns,
            hasher: Arc::new(Hasher::new()),
            shutdown_flag: None,
        })
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops iteration as soon
    /// as possible. This allows for clean Ctrl+C handling.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The canonicalized scan roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk all roots, invoking `on_object` once per discovered object.
    ///
    /// The handler's return value is recorded at trace level only; it has
    /// no effect on traversal. Objects arrive in deterministic order
    /// (children of each directory sorted by name).
    ///
    /// # Errors
    ///
    /// Returns an error when a root directory itself cannot be read.
    /// Failures on entries below a root are logged and skipped.
    pub fn walk<F>(&self, mut on_object: F) -> Result<(), ScanError>
    where
        F: FnMut(&ScannedObject) -> bool,
    {
        for root in &self.roots {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                break;
            }
            if self.exclude_paths.iter().any(|p| root.starts_with(p)) {
                log::debug!("Root is excluded, skipping: {}", root.display());
                continue;
            }

            let metadata = fs::symlink_metadata(root).map_err(|e| resolve_error(root, e))?;
            if metadata.is_file() {
                // A file root is itself the single discovered object.
                let object =
                    ScannedObject::new(root.clone(), true, metadata.len(), Arc::clone(&self.hasher));
                let consumed = on_object(&object);
                log::trace!(
                    "Object {} ({})",
                    object.identity().display(),
                    if consumed { "consumed" } else { "ignored" }
                );
                continue;
            }

            self.walk_directory(root, &mut on_object)?;
        }
        Ok(())
    }

    /// Walk a single directory root.
    fn walk_directory<F>(&self, root: &Path, on_object: &mut F) -> Result<(), ScanError>
    where
        F: FnMut(&ScannedObject) -> bool,
    {
        let matcher = self.build_matcher(root);

        let walk_dir = WalkDir::new(root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        for entry_result in walk_dir {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                break;
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| root.to_path_buf(), std::borrow::ToOwned::to_owned);
                    if path == root {
                        // The root itself is unreadable; nothing to scan.
                        return Err(jwalk_root_error(root, &e));
                    }
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    continue;
                }
            };

            let path = entry.path();

            // The root directory is the container, not a discovered object.
            if path == root {
                continue;
            }

            let file_type = entry.file_type();
            let is_dir = file_type.is_dir();
            if self.is_excluded(root, &path, is_dir, &matcher) {
                log::trace!("Excluded: {}", path.display());
                continue;
            }

            let is_file = file_type.is_file();
            let size = if is_file {
                match fs::symlink_metadata(&path) {
                    Ok(m) => m.len(),
                    Err(e) => {
                        log::warn!("Cannot stat {}: {}", path.display(), e);
                        continue;
                    }
                }
            } else {
                0
            };

            let object = ScannedObject::new(path, is_file, size, Arc::clone(&self.hasher));
            let consumed = on_object(&object);
            log::trace!(
                "Object {} ({})",
                object.identity().display(),
                if consumed { "consumed" } else { "ignored" }
            );
        }
        Ok(())
    }

    /// Build the gitignore matcher for one root from configured patterns.
    fn build_matcher(&self, root: &Path) -> Option<Gitignore> {
        if self.exclude_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(root);
        for pattern in &self.exclude_patterns {
            // Patterns were validated at construction time.
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid exclude pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build exclude patterns: {}", e);
                None
            }
        }
    }

    /// Check if a path is excluded by location prefix or pattern.
    fn is_excluded(&self, root: &Path, path: &Path, is_dir: bool, matcher: &Option<Gitignore>) -> bool {
        if self.exclude_paths.iter().any(|p| path.starts_with(p)) {
            return true;
        }

        if let Some(gi) = matcher {
            // Gitignore matching expects paths relative to the root and
            // uses forward slashes even on Windows.
            let relative = path.strip_prefix(root).unwrap_or(path);
            let path_str = relative.to_string_lossy();
            let normalized = if cfg!(windows) {
                path_str.replace('\\', "/")
            } else {
                path_str.into_owned()
            };

            // Checking parents too makes a bare directory pattern cover
            // everything beneath that directory, matching git semantics.
            return gi.matched_path_or_any_parents(&normalized, is_dir).is_ignore();
        }

        false
    }
}

/// Map a path resolution failure to a [`ScanError`].
fn resolve_error(path: &Path, error: std::io::Error) -> ScanError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::NotFound => {
            log::debug!("Path not found: {}", path.display());
            ScanError::NotFound(path.to_path_buf())
        }
        ErrorKind::PermissionDenied => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path.to_path_buf())
        }
        _ => {
            log::warn!("I/O error for {}: {}", path.display(), error);
            ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// Map a jwalk failure on the root itself to a [`ScanError`].
fn jwalk_root_error(root: &Path, error: &jwalk::Error) -> ScanError {
    if error
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied)
    {
        return ScanError::PermissionDenied(root.to_path_buf());
    }
    ScanError::Io {
        path: root.to_path_buf(),
        source: std::io::Error::other(error.to_string()),
    }
}

/// Validate gitignore-style patterns without keeping the matcher.
fn validate_patterns(patterns: &[String]) -> Result<(), ScanError> {
    let mut builder = GitignoreBuilder::new("");
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| ScanError::Pattern {
                pattern: pattern.clone(),
                source: e,
            })?;
    }
    Ok(())
}
