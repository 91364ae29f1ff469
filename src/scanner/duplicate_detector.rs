//! Duplicate detection: group scanned files by size, then by SHA-256 digest

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::hasher::hash_file;
use crate::scanner::file_scanner::{ScanError, ScanResult};

/// Files that share an exact byte length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    pub size: u64,
    pub paths: Vec<PathBuf>,
}

/// Files with identical content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub digest: String,
    pub size: u64,
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Bytes that would be freed by keeping a single copy
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.paths.len() as u64).saturating_sub(1)
    }
}

/// Outcome of hashing every size-matched candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    pub groups: Vec<DuplicateGroup>,
    /// Files that could not be hashed; they are left out of `groups`
    pub hash_errors: Vec<ScanError>,
    pub files_hashed: usize,
    /// Set when hashing stopped early on request
    pub interrupted: bool,
}

impl DuplicateReport {
    pub fn wasted_bytes(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_bytes).sum()
    }

    /// Number of redundant copies across all groups
    pub fn duplicate_file_count(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len() - 1).sum()
    }
}

/// Bucket scanned files by size, keeping only sizes seen more than once
///
/// Groups come back largest size first; paths keep traversal order.
pub fn group_by_size(scan: &ScanResult) -> Vec<SizeGroup> {
    let mut order: Vec<u64> = Vec::new();
    let mut by_size: HashMap<u64, Vec<PathBuf>> = HashMap::new();

    for file in scan.files() {
        by_size
            .entry(file.size)
            .or_insert_with(|| {
                order.push(file.size);
                Vec::new()
            })
            .push(file.path.clone());
    }

    let mut groups: Vec<SizeGroup> = order
        .into_iter()
        .filter_map(|size| {
            let paths = by_size.remove(&size)?;
            (paths.len() > 1).then_some(SizeGroup { size, paths })
        })
        .collect();

    // Stable sort keeps first-appearance order among equal sizes
    groups.sort_by(|a, b| b.size.cmp(&a.size));
    groups
}

/// Total number of files that need a digest
pub fn candidate_count(groups: &[SizeGroup]) -> usize {
    groups.iter().map(|g| g.paths.len()).sum()
}

/// Find files with identical content among the results of a scan
///
/// # Arguments
/// * `scan` - Output of a completed scan
/// * `cancel` - Checked before each file is hashed
/// * `on_hashed` - Called once per attempted file, for progress reporting
///
/// # Returns
/// Duplicate groups plus any files that could not be hashed
pub fn find_duplicates<F>(scan: &ScanResult, cancel: &AtomicBool, mut on_hashed: F) -> DuplicateReport
where
    F: FnMut(&Path),
{
    let mut report = DuplicateReport::default();

    'groups: for size_group in group_by_size(scan) {
        let mut order: Vec<String> = Vec::new();
        let mut by_digest: HashMap<String, Vec<PathBuf>> = HashMap::new();

        for path in &size_group.paths {
            if cancel.load(Ordering::Relaxed) {
                report.interrupted = true;
                break 'groups;
            }

            match hash_file(path) {
                Ok(digest) => {
                    report.files_hashed += 1;
                    by_digest
                        .entry(digest)
                        .or_insert_with_key(|digest| {
                            order.push(digest.clone());
                            Vec::new()
                        })
                        .push(path.clone());
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping unhashable file: {}", e);
                    report.hash_errors.push(ScanError::new(path.clone(), e.to_string()));
                }
            }
            on_hashed(path);
        }

        for digest in order {
            if let Some(paths) = by_digest.remove(&digest) {
                if paths.len() > 1 {
                    report.groups.push(DuplicateGroup {
                        digest,
                        size: size_group.size,
                        paths,
                    });
                }
            }
        }
    }

    tracing::debug!(
        groups = report.groups.len(),
        hashed = report.files_hashed,
        failed = report.hash_errors.len(),
        interrupted = report.interrupted,
        "duplicate detection finished"
    );

    report
}
