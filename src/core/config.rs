//! Scanner configuration

use serde::{Deserialize, Serialize};

/// Options that control which files a scan reports.
///
/// Built once and handed to [`Scanner`](crate::scanner::file_scanner::Scanner);
/// there is no way to change it afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Files strictly smaller than this many bytes are left out of the
    /// results. They are not errors.
    pub min_size: u64,
}

impl ScanConfig {
    /// Create a configuration with the given minimum file size in bytes
    pub fn new(min_size: u64) -> Self {
        Self { min_size }
    }

    /// Whether a file of `size` bytes passes the size filter
    pub fn accepts(&self, size: u64) -> bool {
        size >= self.min_size
    }
}
