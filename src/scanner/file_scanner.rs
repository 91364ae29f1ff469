//! Directory traversal and size filtering

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::config::ScanConfig;

/// A regular file that passed the size filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    /// Length in bytes when the entry was visited
    pub size: u64,
}

/// An entry below the root that could not be processed.
///
/// These do not stop a scan; they are collected in [`ScanResult::errors`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub path: PathBuf,
    pub message: String,
}

impl ScanError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    fn from_walk(err: walkdir::Error, fallback: &Path) -> Self {
        let path = err.path().unwrap_or(fallback).to_path_buf();
        let message = match err.io_error() {
            Some(io_err) => io_err.to_string(),
            None => err.to_string(),
        };
        Self { path, message }
    }
}

/// Everything a single scan found.
///
/// `total_bytes` always equals the sum of the sizes in `files`; the fields
/// are only reachable through accessors so the two cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    files: Vec<FileInfo>,
    errors: Vec<ScanError>,
    total_bytes: u64,
}

impl ScanResult {
    /// Qualifying files in traversal order
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// Entry failures in the order they were hit
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Sum of the sizes of all qualifying files
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn push_file(&mut self, file: FileInfo) {
        self.total_bytes += file.size;
        self.files.push(file);
    }

    pub(crate) fn push_error(&mut self, error: ScanError) {
        self.errors.push(error);
    }
}

impl FromIterator<FileInfo> for ScanResult {
    fn from_iter<I: IntoIterator<Item = FileInfo>>(iter: I) -> Self {
        let mut result = ScanResult::default();
        for file in iter {
            result.push_file(file);
        }
        result
    }
}

/// Failure that aborts a whole scan. Only the root can cause one.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// Root path does not exist.
    #[error("root not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Root path cannot be entered.
    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// Root path exists but is not a directory.
    #[error("root is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    /// Any other I/O failure on the root.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cancellation flag was raised before the walk finished.
    #[error("scan interrupted")]
    Interrupted,
}

impl TraversalError {
    /// Classify an I/O error on `path`
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    fn from_walk(err: walkdir::Error, root: &Path) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        let message = err.to_string();
        match err.into_io_error() {
            Some(source) => Self::io(path, source),
            None => Self::Io {
                path,
                source: io::Error::other(message),
            },
        }
    }
}

/// Walks a directory tree and collects regular files at or above a
/// minimum size.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner that skips files smaller than `min_size` bytes
    pub fn new(min_size: u64) -> Self {
        Self::with_config(ScanConfig::new(min_size))
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn min_size(&self) -> u64 {
        self.config.min_size
    }

    /// Scan the tree under `root`
    ///
    /// # Arguments
    /// * `root` - Directory to walk; symbolic links below it are not followed
    ///
    /// # Returns
    /// The files found plus every per-entry failure, or a [`TraversalError`]
    /// when the root itself cannot be walked
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<ScanResult, TraversalError> {
        let never = AtomicBool::new(false);
        self.scan_with_cancel(root, &never)
    }

    /// Same as [`Scanner::scan`], but gives up with
    /// [`TraversalError::Interrupted`] once `cancel` is set. The flag is
    /// checked before each entry.
    pub fn scan_with_cancel(
        &self,
        root: impl AsRef<Path>,
        cancel: &AtomicBool,
    ) -> Result<ScanResult, TraversalError> {
        let root = root.as_ref();

        let metadata = fs::metadata(root).map_err(|e| TraversalError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(TraversalError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let result = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .try_fold(ScanResult::default(), |mut result, entry| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(TraversalError::Interrupted);
                }

                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) if err.depth() == 0 => {
                        return Err(TraversalError::from_walk(err, root));
                    }
                    Err(err) => {
                        let error = ScanError::from_walk(err, root);
                        tracing::warn!(path = %error.path.display(), "{}", error.message);
                        result.push_error(error);
                        return Ok(result);
                    }
                };

                // Directories are descended into by the walker itself
                if !entry.file_type().is_file() {
                    return Ok(result);
                }

                let size = match entry.metadata() {
                    Ok(metadata) => metadata.len(),
                    Err(err) => {
                        let error = ScanError::from_walk(err, entry.path());
                        tracing::warn!(path = %error.path.display(), "{}", error.message);
                        result.push_error(error);
                        return Ok(result);
                    }
                };

                if self.config.accepts(size) {
                    result.push_file(FileInfo {
                        path: entry.into_path(),
                        size,
                    });
                }

                Ok(result)
            })?;

        tracing::debug!(
            root = %root.display(),
            files = result.files().len(),
            errors = result.errors().len(),
            total_bytes = result.total_bytes(),
            "scan finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(path: &Path, len: usize) {
        let mut file = File::create(path).unwrap();
        file.write_all(&vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_scan_flat_directory() {
        let temp_dir = TempDir::new().unwrap();
        let big = temp_dir.path().join("big.bin");
        write_file(&big, 500);
        write_file(&temp_dir.path().join("small.bin"), 50);

        let result = Scanner::new(100).scan(temp_dir.path()).unwrap();
        assert_eq!(result.files(), &[FileInfo { path: big, size: 500 }]);
        assert!(result.errors().is_empty());
        assert_eq!(result.total_bytes(), 500);
    }

    #[test]
    fn test_scan_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        write_file(&temp_dir.path().join("a.txt"), 500);
        write_file(&temp_dir.path().join("b.txt"), 50);
        write_file(&subdir.join("c.txt"), 500);

        let result = Scanner::new(100).scan(temp_dir.path()).unwrap();
        assert_eq!(result.files().len(), 2);
        assert_eq!(result.total_bytes(), 1000);
    }

    #[test]
    fn test_zero_min_size_includes_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("empty")).unwrap();

        let result = Scanner::default().scan(temp_dir.path()).unwrap();
        assert_eq!(result.files().len(), 1);
        assert_eq!(result.files()[0].size, 0);
        assert_eq!(result.total_bytes(), 0);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = Scanner::new(0).scan(&missing).unwrap_err();
        assert!(matches!(err, TraversalError::NotFound { ref path } if *path == missing));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        write_file(&file, 10);

        let err = Scanner::new(0).scan(&file).unwrap_err();
        assert!(matches!(err, TraversalError::NotADirectory { .. }));
    }

    #[test]
    fn test_cancelled_scan_returns_no_result() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir.path().join("a.txt"), 10);

        let cancel = AtomicBool::new(true);
        let err = Scanner::new(0)
            .scan_with_cancel(temp_dir.path(), &cancel)
            .unwrap_err();
        assert!(matches!(err, TraversalError::Interrupted));
    }

    #[test]
    fn test_result_from_iter_keeps_total() {
        let result: ScanResult = vec![
            FileInfo { path: PathBuf::from("/a"), size: 3 },
            FileInfo { path: PathBuf::from("/b"), size: 4 },
        ]
        .into_iter()
        .collect();

        assert_eq!(result.files().len(), 2);
        assert_eq!(result.total_bytes(), 7);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_traversal_error_classifies_kind() {
        let err = TraversalError::io("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, TraversalError::PermissionDenied { .. }));

        let err = TraversalError::io("/x", io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(err, TraversalError::Io { .. }));
    }
}
